//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 行读取与解析：`key,value[,ignored...]`
//!
//! 行结束符可以是 `\n`、`\r\n` 或单独的 `\r`。

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// 字段分隔符
pub const DELIMITER: char = ',';

/// UTF-8 字节顺序标记
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 读取下一行（不含行结束符）到 `line`
///
/// 数据流结束且没有读到任何内容时返回 `false`。
pub async fn read_line<R>(source: &mut R, line: &mut Vec<u8>) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();
    // 已读到 `\r`，紧随其后的一个 `\n` 属于同一个结束符
    let mut after_cr = false;

    loop {
        let available = source.fill_buf().await?;
        if available.is_empty() {
            return Ok(after_cr || !line.is_empty());
        }
        if after_cr {
            if available[0] == b'\n' {
                source.consume(1);
            }
            return Ok(true);
        }

        match available.iter().position(|b| *b == b'\n' || *b == b'\r') {
            Some(end) => {
                line.extend_from_slice(&available[..end]);
                let is_cr = available[end] == b'\r';
                source.consume(end + 1);
                if !is_cr {
                    return Ok(true);
                }
                after_cr = true;
            }
            None => {
                let len = available.len();
                line.extend_from_slice(available);
                source.consume(len);
            }
        }
    }
}

/// 去掉开头的 UTF-8 BOM
pub fn strip_bom(line: &[u8]) -> &[u8] {
    line.strip_prefix(UTF8_BOM).unwrap_or(line)
}

/// 将一行拆分为键值对
///
/// 少于两个字段的行返回 `None`；第二个字段之后的内容被忽略。
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let mut fields = line.split(DELIMITER);
    let key = fields.next()?;
    let value = fields.next()?;
    Some((key, value))
}

/// 解析原始字节行，无法按 UTF-8 解码的行视为不可读并返回 `None`
pub fn parse_raw_line(raw: &[u8]) -> Option<(String, String)> {
    let text = std::str::from_utf8(raw).ok()?;
    parse_line(text).map(|(k, v)| (k.to_string(), v.to_string()))
}
