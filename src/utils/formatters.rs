// Formatting utilities

use crate::models::game_data::SpellVar;

const WIKI_BASE: &str = "https://leagueoflegends.fandom.com/wiki";

/// Format a number with thousands separators
pub fn format_number(n: i64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 && chars[i - 1] != '-' {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Collapse whitespace and cut at a word boundary so the result, placeholder
/// included, fits in `width` characters
pub fn shorten(text: &str, width: usize, placeholder: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let joined = words.join(" ");
    if joined.chars().count() <= width {
        return joined;
    }

    let budget = width.saturating_sub(placeholder.chars().count());
    let mut result = String::new();
    for word in words {
        let extra = if result.is_empty() { 0 } else { 1 };
        if result.chars().count() + extra + word.chars().count() > budget {
            break;
        }
        if extra == 1 {
            result.push(' ');
        }
        result.push_str(word);
    }
    result.push_str(placeholder);
    result
}

/// Strip Data Dragon markup (<br>, <mainText>, <b>...) down to plain text
pub fn strip_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for ch in input.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag.trim_start_matches('/').trim_end_matches('/').trim();
                let name = name.split_whitespace().next().unwrap_or("").to_ascii_lowercase();
                if name == "br" || name == "li" {
                    out.push('\n');
                }
            }
            _ if in_tag => tag.push(ch),
            _ => out.push(ch),
        }
    }

    let decoded = html_escape::decode_html_entities(&out).replace('\u{a0}', " ");

    decoded
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Substitute `{{ eN }}` with effect values and `{{ aN }}`/`{{ fN }}` with
/// ratio coefficients. Unknown placeholders become "?".
pub fn parse_tooltip(tooltip: &str, effect_burn: &[Option<String>], vars: &[SpellVar]) -> String {
    let mut out = String::with_capacity(tooltip.len());
    let mut rest = tooltip;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after[..end].trim();
        out.push_str(&resolve_placeholder(key, effect_burn, vars));
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn resolve_placeholder(key: &str, effect_burn: &[Option<String>], vars: &[SpellVar]) -> String {
    if let Some(index) = key.strip_prefix('e').and_then(|i| i.parse::<usize>().ok()) {
        if let Some(Some(value)) = effect_burn.get(index) {
            return value.clone();
        }
    }

    if let Some(var) = vars.iter().find(|v| v.key == key) {
        let coeff = match &var.coeff {
            serde_json::Value::Array(values) => values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("/"),
            serde_json::Value::Null => return "?".to_string(),
            other => other.to_string(),
        };
        return coeff;
    }

    "?".to_string()
}

/// Wiki page for a champion/item/etc.
pub fn wiki_link(page: &str) -> String {
    format!("{WIKI_BASE}/{}", wiki_title(page))
}

/// Wiki page scrolled to a section
pub fn wiki_anchor(page: &str, section: &str) -> String {
    format!("{}#{}", wiki_link(page), wiki_title(section))
}

fn wiki_title(title: &str) -> String {
    urlencoding::encode(&title.replace(' ', "_")).into_owned()
}

/// Store price of a skin
pub fn format_price(price: Option<i64>, currency: &str) -> String {
    match price {
        None => "Unknown".to_string(),
        Some(p) if p <= 0 => "Free/Limited Edition".to_string(),
        Some(p) => format!("{} {}", p, currency),
    }
}

/// Pluralize "point"
pub fn points_label(points: i64) -> String {
    if points == 1 {
        "1 point".to_string()
    } else {
        format!("{} points", format_number(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1000000), "1,000,000");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(-1000), "-1,000");
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("Hello   world", 20, "..."), "Hello world");
        assert_eq!(shorten("Hello world!", 11, "..."), "Hello...");
        let long = "word ".repeat(50);
        let short = shorten(&long, 125, "...");
        assert!(short.chars().count() <= 125);
        assert!(short.ends_with("word..."));
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<mainText><stats>+10 Attack Damage</stats><br><br>Cheap &amp; cheerful</mainText>"),
            "+10 Attack Damage\n\nCheap & cheerful"
        );
        assert_eq!(strip_html("no markup"), "no markup");
        assert_eq!(strip_html("a&nbsp;b &lt;3"), "a b <3");
    }

    #[test]
    fn test_parse_tooltip() {
        let effects = vec![None, Some("10/20/30".to_string())];
        let vars = vec![
            SpellVar { key: "a1".into(), link: "attackdamage".into(), coeff: json!(0.6) },
            SpellVar { key: "f2".into(), link: "bonushealth".into(), coeff: json!([0.1, 0.2]) },
        ];
        assert_eq!(
            parse_tooltip("Deals {{ e1 }} (+{{ a1 }}) and {{f2}} {{ e9 }}", &effects, &vars),
            "Deals 10/20/30 (+0.6) and 0.1/0.2 ?"
        );
        assert_eq!(parse_tooltip("unterminated {{ e1", &effects, &vars), "unterminated {{ e1");
    }

    #[test]
    fn test_wiki_links() {
        assert_eq!(
            wiki_link("Lee Sin"),
            "https://leagueoflegends.fandom.com/wiki/Lee_Sin"
        );
        assert_eq!(
            wiki_anchor("Lee Sin", "Sonic Wave"),
            "https://leagueoflegends.fandom.com/wiki/Lee_Sin#Sonic_Wave"
        );
        assert_eq!(
            wiki_link("Nunu & Willump"),
            "https://leagueoflegends.fandom.com/wiki/Nunu_%26_Willump"
        );
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(None, "RP"), "Unknown");
        assert_eq!(format_price(Some(0), "RP"), "Free/Limited Edition");
        assert_eq!(format_price(Some(1350), "RP"), "1350 RP");
    }

    #[test]
    fn test_points_label() {
        assert_eq!(points_label(1), "1 point");
        assert_eq!(points_label(1500), "1,500 points");
    }
}
