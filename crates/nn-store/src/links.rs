//! Link records: one `from-to-style` line per link.
//!
//! Two record shapes are accepted on read:
//! - `abc123-def456-style` (written by this crate)
//! - `abc123def456-style` (ids concatenated, as older books store them)
//!
//! A record without a style tag (`abc123-def456`) gets the default style.

use crate::error::LoadError;
use nn_core::id::ID_LEN;
use nn_core::{DEFAULT_LINK_STYLE, Link, PageId};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use winnow::combinator::{alt, opt, preceded};
use winnow::prelude::*;
use winnow::token::take_while;

/// Links read from one file, with the records that failed to parse.
#[derive(Debug, Default)]
pub struct LinkFile {
    pub links: Vec<Link>,
    pub malformed: Vec<LoadError>,
}

/// Canonical record text for `link`.
pub fn format_link(link: &Link) -> String {
    format!("{}-{}-{}", link.from, link.to, link.style)
}

/// Parse one record. Surrounding whitespace is ignored.
pub fn parse_link(record: &str) -> Option<Link> {
    alt((parse_separated, parse_concatenated))
        .parse(record.trim())
        .ok()
}

/// Read every record in `path`. A missing file holds no links.
pub async fn read_links(path: &Path) -> Result<LinkFile, LoadError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(LinkFile::default()),
        Err(e) => return Err(LoadError::io(path, e)),
    };
    Ok(parse_link_file(path, &text))
}

/// Append `link` as one record, creating the file if needed.
pub async fn append_link(path: &Path, link: &Link) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(format!("{}\n", format_link(link)).as_bytes())
        .await?;
    file.flush().await
}

fn parse_link_file(path: &Path, text: &str) -> LinkFile {
    let mut out = LinkFile::default();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_link(line) {
            Some(link) => out.links.push(link),
            None => out.malformed.push(LoadError::MalformedLink {
                path: path.to_path_buf(),
                line: i + 1,
                record: line.trim().to_string(),
            }),
        }
    }
    out
}

// ─── Grammar ─────────────────────────────────────────────────────────────

fn parse_page_id(input: &mut &str) -> ModalResult<PageId> {
    take_while(ID_LEN, |c: char| c.is_ascii_lowercase() || c.is_ascii_digit())
        .try_map(PageId::parse)
        .parse_next(input)
}

fn parse_style<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| !c.is_whitespace() && c != ',').parse_next(input)
}

/// `from-to[-style]`
fn parse_separated(input: &mut &str) -> ModalResult<Link> {
    let from = parse_page_id.parse_next(input)?;
    '-'.parse_next(input)?;
    let to = parse_page_id.parse_next(input)?;
    let style = opt(preceded('-', parse_style)).parse_next(input)?;
    Ok(Link::styled(from, to, style.unwrap_or(DEFAULT_LINK_STYLE)))
}

/// `fromto-style`
fn parse_concatenated(input: &mut &str) -> ModalResult<Link> {
    let from = parse_page_id.parse_next(input)?;
    let to = parse_page_id.parse_next(input)?;
    let style = preceded('-', parse_style).parse_next(input)?;
    Ok(Link::styled(from, to, style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pid(s: &str) -> PageId {
        PageId::parse(s).unwrap()
    }

    #[test]
    fn parse_separated_record() {
        assert_eq!(
            parse_link("abc123-def456-dashed"),
            Some(Link::styled(pid("abc123"), pid("def456"), "dashed"))
        );
    }

    #[test]
    fn parse_record_without_style() {
        assert_eq!(
            parse_link("  abc123-def456 "),
            Some(Link::new(pid("abc123"), pid("def456")))
        );
    }

    #[test]
    fn parse_concatenated_record() {
        assert_eq!(
            parse_link("abc123def456-default"),
            Some(Link::new(pid("abc123"), pid("def456")))
        );
    }

    #[test]
    fn reject_malformed_records() {
        for bad in [
            "",
            "abc123",
            "abc12-def456-default",
            "ABC123-def456-default",
            "abc123-def456-",
            "abc123def456",
            "abc123-def456-a b",
            "abc123--def456",
        ] {
            assert_eq!(parse_link(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn formatted_record_parses_back() {
        let link = Link::styled(pid("zz0099"), pid("a1b2c3"), "thick");
        assert_eq!(format_link(&link), "zz0099-a1b2c3-thick");
        assert_eq!(parse_link(&format_link(&link)), Some(link));
    }

    #[test]
    fn file_reports_malformed_lines() {
        let text = "abc123-def456-default\n\nnot a link\nabc123def456-x\n";
        let file = parse_link_file(Path::new("links.csv"), text);
        assert_eq!(file.links.len(), 2);
        assert_eq!(file.malformed.len(), 1);
        match &file.malformed[0] {
            LoadError::MalformedLink { line, record, .. } => {
                assert_eq!(*line, 3);
                assert_eq!(record, "not a link");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = read_links(&dir.path().join("links.csv")).await.unwrap();
        assert!(file.links.is_empty());
        assert!(file.malformed.is_empty());
    }

    #[tokio::test]
    async fn append_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.csv");
        let a = Link::new(pid("aaaaaa"), pid("bbbbbb"));
        let b = Link::styled(pid("bbbbbb"), pid("cccccc"), "dotted");
        append_link(&path, &a).await.unwrap();
        append_link(&path, &b).await.unwrap();
        let file = read_links(&path).await.unwrap();
        assert_eq!(file.links, vec![a, b]);
    }
}
