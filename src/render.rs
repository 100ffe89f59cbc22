use crate::classifier::Classification;

/// Result block shown in the page's results area.
pub fn render_result_html(result: &Classification) -> String {
    format!(
        "<strong>Prediction:</strong> {} <br>\n<strong>How to Dispose:</strong> <br> {}",
        result.label,
        result.guidance_html()
    )
}

pub fn render_result_text(result: &Classification) -> String {
    format!(
        "Prediction: {} ({:.2}%)\nHow to dispose:\n{}",
        result.label,
        result.score * 100.0,
        result.guidance.to_text()
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::builtin_guidance;
    use crate::mapping::WasteLabel;

    fn plastic() -> Classification {
        Classification {
            label: WasteLabel::Plastic,
            score: 0.875,
            guidance: builtin_guidance(WasteLabel::Plastic),
        }
    }

    #[test]
    fn html_matches_result_layout() {
        let html = render_result_html(&plastic());
        assert!(html.starts_with("<strong>Prediction:</strong> Plastic Waste <br>"));
        assert!(html.contains("<strong>How to Dispose:</strong> <br> <strong>Common Types:</strong>"));
    }

    #[test]
    fn text_shows_percentage() {
        let text = render_result_text(&plastic());
        assert!(text.starts_with("Prediction: Plastic Waste (87.50%)"));
        assert!(text.contains("Recycling"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
