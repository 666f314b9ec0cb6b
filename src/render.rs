// src/render.rs
//! HTML rendering of the selected records into the newsletter body.
//! Pure string building; the pipeline itself knows nothing about HTML.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::highlights::Record;

const STYLE: &str = r#"body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,"Helvetica Neue",Arial,"PingFang SC","Microsoft YaHei",sans-serif;background:#f6f7f9;color:#222;line-height:1.6;margin:0}
.container{max-width:760px;margin:32px auto;padding:0 16px}
.header{text-align:center;padding:16px}
.header h1{font-size:24px;margin:0 0 6px}
.header p{font-size:14px;color:#666;margin:0}
.grid{display:grid;grid-template-columns:1fr 1fr;gap:16px;margin-top:16px}
@media (max-width:640px){.grid{grid-template-columns:1fr}}
.card{background:#fff;border:1px solid #e6e8eb;border-radius:12px;overflow:hidden;box-shadow:0 2px 8px rgba(0,0,0,0.04);display:flex;flex-direction:column}
.thumb{position:relative;width:100%;padding-top:56.25%;background:#f0f2f5;overflow:hidden}
.thumb img{position:absolute;inset:0;width:100%;height:100%;object-fit:cover;display:block}
.content{padding:14px;display:flex;flex-direction:column;gap:8px}
.title{font-size:16px;font-weight:700;color:#111;text-decoration:none}
.meta{font-size:12px;color:#6b7280;display:flex;gap:10px;flex-wrap:wrap}
.badge{background:#111;color:#fff;font-size:11px;padding:2px 6px;border-radius:6px}
.summary{font-size:14px;color:#333}
.footer{text-align:center;color:#8a8f98;font-size:12px;padding:24px 0}
a{color:inherit}
.cat{font-weight:600;opacity:.8}"#;

fn push_card(out: &mut String, rec: &Record) {
    let title = encode_text(&rec.title);
    let link = encode_double_quoted_attribute(&rec.link_url);

    out.push_str("<article class=\"card\">\n<div class=\"thumb\">");
    if !rec.image_url.is_empty() {
        let img = encode_double_quoted_attribute(&rec.image_url);
        let _ = write!(
            out,
            "<a href=\"{link}\" target=\"_blank\" rel=\"noopener\"><img src=\"{img}\" alt=\"{}\"></a>",
            encode_double_quoted_attribute(&rec.title)
        );
    }
    out.push_str("</div>\n<div class=\"content\">\n");

    let _ = write!(
        out,
        "<a class=\"title\" href=\"{link}\" target=\"_blank\" rel=\"noopener\">{title}</a>\n"
    );

    out.push_str("<div class=\"meta\">");
    let _ = write!(out, "<span class=\"cat\">{}</span>", encode_text(&rec.category));
    // Display only the date part of e.g. "2025-10-13 08:30:00".
    if let Some(day) = rec.published_at.split(' ').next().filter(|d| !d.is_empty()) {
        let _ = write!(out, "<span>{}</span>", encode_text(day));
    }
    let _ = write!(out, "<span class=\"badge\">热度 {}</span>", rec.heat);
    out.push_str("</div>\n");

    if !rec.summary.is_empty() {
        let _ = write!(
            out,
            "<div class=\"summary\">{}</div>\n",
            encode_text(&rec.summary)
        );
    }
    out.push_str("</div>\n</article>\n");
}

/// Render only the card grid fragment, one `<article>` per record.
pub fn render_cards(records: &[Record]) -> String {
    let mut out = String::with_capacity(records.len() * 1024);
    for rec in records {
        push_card(&mut out, rec);
    }
    out
}

/// Render the full newsletter document with the built-in layout.
/// `date` is the issue date (YYYY-MM-DD), `year` feeds the footer
/// copyright line.
pub fn render_newsletter(records: &[Record], heading: &str, date: &str, year: i32) -> String {
    let mut out = String::with_capacity(4096 + records.len() * 1024);

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"zh\"><head><meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"container\">\n<div class=\"header\">\n<h1>{}</h1>\n<p>{}</p>\n</div>\n\
         <div class=\"grid\">\n",
        encode_text(heading),
        encode_text(heading),
        encode_text(date)
    );

    out.push_str(&render_cards(records));

    let _ = write!(
        out,
        "</div>\n<div class=\"footer\">© {year} Tech Newsletter</div>\n</div>\n</body></html>"
    );
    out
}

/// Render into a caller-supplied page template instead of the built-in
/// layout. Recognized placeholders: `{{ heading }}`, `{{ date }}`,
/// `{{ year }}`, and `{{ items }}` (the rendered card grid). Heading
/// and date are HTML-escaped; the cards arrive escaped already.
pub fn render_with_template(
    template: &str,
    records: &[Record],
    heading: &str,
    date: &str,
    year: i32,
) -> String {
    template
        .replace("{{ items }}", &render_cards(records))
        .replace("{{ heading }}", encode_text(heading).as_ref())
        .replace("{{ date }}", encode_text(date).as_ref())
        .replace("{{ year }}", &year.to_string())
}
