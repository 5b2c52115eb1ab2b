//! Terminal output for search results and stored catalogs

use crate::catalog::store::StoredCatalog;
use crate::search::{Content, DisplayLine, LineStyle};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print search content to stdout
pub fn print_content(content: &Content, top_url: Option<&str>, color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    write_lines(&mut stdout, &content.lines())?;

    if let Some(url) = top_url {
        writeln!(stdout)?;
        write!(stdout, "=> ")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(stdout, "{}", url)?;
        stdout.reset()?;
    }

    Ok(())
}

/// Write display lines with headings, highlights and URLs colored
pub fn write_lines<W: WriteColor>(out: &mut W, lines: &[DisplayLine]) -> io::Result<()> {
    for line in lines {
        match line {
            DisplayLine::Heading(text) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
                writeln!(out, "{}", text)?;
                out.reset()?;
            }
            DisplayLine::Entry {
                text,
                detail,
                url,
                style,
            } => {
                write!(out, "  ")?;
                match style {
                    LineStyle::Highlight => {
                        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                    }
                    LineStyle::Dim => {
                        out.set_color(ColorSpec::new().set_dimmed(true))?;
                    }
                    LineStyle::Normal => {}
                }
                write!(out, "{}", text)?;
                out.reset()?;

                if let Some(detail) = detail {
                    write!(out, " ({})", detail)?;
                }
                if let Some(url) = url {
                    write!(out, "  ")?;
                    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                    write!(out, "{}", url)?;
                    out.reset()?;
                }
                writeln!(out)?;
            }
            DisplayLine::Text(text) => writeln!(out, "{}", text)?,
            DisplayLine::Blank => writeln!(out)?,
        }
    }
    Ok(())
}

/// Print stored catalogs (for `jdsearch list`)
pub fn print_catalogs(catalogs: &[StoredCatalog]) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    if catalogs.is_empty() {
        writeln!(stdout, "No catalogs imported")?;
        return Ok(());
    }

    for catalog in catalogs {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(stdout, "{}", catalog.docs_root.display())?;
        stdout.reset()?;
        write!(stdout, ": ")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "{}", catalog.entries)?;
        stdout.reset()?;
        writeln!(stdout, " names, {}", catalog.base_url)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::Buffer;

    #[test]
    fn test_plain_lines() {
        let lines = vec![
            DisplayLine::Heading("Classes".to_string()),
            DisplayLine::Entry {
                text: "Object".to_string(),
                detail: Some("java.lang".to_string()),
                url: Some("docs/java/lang/Object.html".to_string()),
                style: LineStyle::Highlight,
            },
            DisplayLine::Blank,
            DisplayLine::Text("loading...".to_string()),
        ];

        let mut buffer = Buffer::no_color();
        write_lines(&mut buffer, &lines).unwrap();

        assert_eq!(
            String::from_utf8(buffer.into_inner()).unwrap(),
            "Classes\n  Object (java.lang)  docs/java/lang/Object.html\n\nloading...\n"
        );
    }

    #[test]
    fn test_colored_heading() {
        let mut buffer = Buffer::ansi();
        write_lines(&mut buffer, &[DisplayLine::Heading("Packages".to_string())]).unwrap();

        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.contains("\x1b["));
        assert!(text.contains("Packages"));
    }
}
