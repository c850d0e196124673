//! Printable table flyer: restaurant header, QR code and menu URL

use shared::models::Restaurant;

/// Minimal HTML escaping for text and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `qr_svg` is embedded as-is and must come from [`crate::qr::render_svg`]
pub fn render_flyer(restaurant: &Restaurant, menu_url: &str, qr_svg: &str) -> String {
    let name = escape_html(&restaurant.name);
    let location = escape_html(&restaurant.location);
    let url = escape_html(menu_url);
    let color = escape_html(&restaurant.theme_color);
    let logo = restaurant
        .logo_url
        .as_deref()
        .map(|src| {
            format!(
                r#"<img class="logo" src="{}" alt="{name}">"#,
                escape_html(src)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{name} · Menu</title>
<style>
  body {{ font-family: sans-serif; text-align: center; margin: 0; padding: 48px; }}
  header {{ background: {color}; color: #fff; padding: 24px; border-radius: 12px; }}
  .logo {{ width: 96px; height: 96px; border-radius: 50%; background: #fff; padding: 8px; }}
  .qr {{ margin: 32px auto; width: 300px; }}
  .url {{ color: {color}; font-size: 14px; word-break: break-all; }}
  @media print {{ body {{ padding: 0; }} }}
</style>
</head>
<body>
<header>
{logo}
<h1>{name}</h1>
<p>{location}</p>
</header>
<h2>Scan to see our menu</h2>
<div class="qr">{qr_svg}</div>
<p class="url">{url}</p>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::tests::sample_restaurant;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_flyer_contains_escaped_name_and_qr() {
        let mut r = sample_restaurant();
        r.name = "Fish & Chips <Deluxe>".into();
        let html = render_flyer(&r, "https://m.example.com/r/fish", "<svg></svg>");
        assert!(html.contains("Fish &amp; Chips &lt;Deluxe&gt;"));
        assert!(html.contains("<svg></svg>"));
        assert!(html.contains("https://m.example.com/r/fish"));
        assert!(html.contains(&r.theme_color));
        assert!(!html.contains("class=\"logo\""));
    }
}
