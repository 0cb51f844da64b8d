//! HTML writer. A self-contained page: embedded `<style>`, logo as a `data:` URI,
//! no external references.

use crate::render::escape_markup;
use crate::render::logo::Logo;
use crate::render::narrative::{Block, Letter, Run};

pub const HTML_MIME: &str = "text/html";

const STYLE: &str = r#"        body {
            font-family: 'Roboto', Arial, sans-serif;
            font-size: 10pt;
            line-height: 1.4;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
        }
        .date {
            font-weight: bold;
            margin-bottom: 20px;
        }
        .address {
            margin: 20px 0;
            white-space: pre-line;
        }
        .salutation {
            font-weight: bold;
            margin: 15px 0;
        }
        .section-heading {
            font-weight: bold;
            margin: 15px 0 10px 0;
        }
        .intro-highlight {
            font-weight: bold;
        }
        ul {
            margin: 15px 0;
            padding-left: 20px;
        }
        li {
            margin-bottom: 10px;
        }
        .bullet-bold {
            font-weight: bold;
        }
        .signature {
            margin-top: 30px;
        }
        .valediction {
            font-weight: bold;
        }
        .signature-name {
            font-weight: bold;
            margin-top: 60px;
        }
        .footer {
            margin-top: 60px;
            font-style: italic;
        }
        .header-logo {
            float: right;
            width: 150px;
            height: auto;
            margin-bottom: 20px;
        }
        .clear {
            clear: both;
        }
"#;

/// Renders the letter as a complete HTML document.
pub fn render_html(letter: &Letter, logo: Option<&Logo>) -> String {
    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\">\n");
    html.push_str(&format!(
        "    <title>MP Letter - {}</title>\n",
        escape_markup(&letter.addressee)
    ));
    html.push_str("    <style>\n");
    html.push_str(STYLE);
    html.push_str("    </style>\n</head>\n<body>\n");

    if let Some(logo) = logo {
        html.push_str(&format!(
            "    <div class=\"header-logo\">\n        <img src=\"{}\" alt=\"Violet Logo\" style=\"width: 150px; height: auto;\">\n    </div>\n",
            logo.data_uri()
        ));
    }
    html.push_str("    <div class=\"clear\"></div>\n");

    for block in &letter.blocks {
        html.push('\n');
        html.push_str(&block_html(block));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn block_html(block: &Block) -> String {
    match block {
        Block::Date(date) => format!("    <div class=\"date\">{}</div>\n", escape_markup(date)),
        Block::Address(text) => {
            format!("    <div class=\"address\">{}</div>\n", escape_markup(text))
        }
        Block::Greeting(text) => {
            format!("    <div class=\"salutation\">{}</div>\n", escape_markup(text))
        }
        Block::Heading(text) => format!(
            "    <div class=\"section-heading\">{}</div>\n",
            escape_markup(text)
        ),
        Block::Paragraph(runs) => format!("    <p>{}</p>\n", runs_html(runs, "intro-highlight")),
        Block::Evidence(bullets) => {
            let mut out = String::from("    <ul>\n");
            for bullet in bullets {
                out.push_str(&format!(
                    "        <li>{}</li>\n",
                    runs_html(&bullet.runs(), "bullet-bold")
                ));
            }
            out.push_str("    </ul>\n");
            out
        }
        Block::SignOff {
            valediction,
            name,
            title,
        } => format!(
            concat!(
                "    <div class=\"signature\">\n",
                "        <div class=\"valediction\">{}</div>\n",
                "        <div class=\"signature-name\">{}</div>\n",
                "        <div>{}</div>\n",
                "    </div>\n",
            ),
            escape_markup(valediction),
            escape_markup(name),
            escape_markup(title),
        ),
        Block::Attachment(note) => {
            format!("    <div class=\"footer\">{}</div>\n", escape_markup(note))
        }
    }
}

/// Bold runs become `<span class="{bold_class}">`, italic runs `<em>`, `\n` `<br>`.
fn runs_html(runs: &[Run], bold_class: &str) -> String {
    let mut out = String::new();
    for run in runs {
        let text = escape_markup(&run.text).replace('\n', "<br>");
        let text = if run.italic {
            format!("<em>{text}</em>")
        } else {
            text
        };
        if run.bold {
            out.push_str(&format!("<span class=\"{bold_class}\">{text}</span>"));
        } else {
            out.push_str(&text);
        }
    }
    out
}
