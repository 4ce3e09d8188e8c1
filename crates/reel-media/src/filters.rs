//! FFmpeg video filter construction.

/// Caption rendering parameters.
#[derive(Debug, Clone)]
pub struct CaptionStyle {
    /// Font size in pixels at the output resolution
    pub font_size: u32,
    /// Maximum characters per wrapped caption line
    pub max_line_chars: usize,
    /// Distance from the bottom edge to the caption baseline box
    pub bottom_margin: u32,
    /// Explicit font file; fontconfig default when unset
    pub font_file: Option<String>,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size: 60,
            // ~900 px of glyphs at font size 60 on a 1080 px frame
            max_line_chars: 26,
            bottom_margin: 160,
            font_file: std::env::var("REEL_FONT_FILE").ok(),
        }
    }
}

/// Filter that fills the target frame from an arbitrary still:
/// scale so both edges cover the frame, then center-crop to exactly
/// `width`x`height`. The crop region is centered, so the same image and
/// target always yield the same pixels.
pub fn vertical_fill_filter(width: u32, height: u32) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}",
        w = width,
        h = height
    )
}

/// Word-wrap caption text to at most `max_chars` characters per line.
///
/// Width is counted in characters, not bytes, so accented narration
/// wraps at the intended glyph width. Words longer than a line get
/// their own line rather than being split.
pub fn wrap_caption(text: &str, max_chars: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if current.is_empty() {
            current = word.to_string();
            current_chars = word_chars;
        } else if current_chars + 1 + word_chars <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_chars += 1 + word_chars;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
            current_chars = word_chars;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

/// Escape text for a drawtext `text=` value.
fn escape_drawtext(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            ':' => out.push_str("\\:"),
            '%' => out.push_str("\\%"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the burned-in caption filter: wrapped narration text, centered
/// horizontally, anchored near the bottom, shown for the whole clip.
pub fn caption_filter(text: &str, style: &CaptionStyle) -> String {
    let wrapped = wrap_caption(text, style.max_line_chars);
    let escaped = escape_drawtext(&wrapped);

    let mut filter = format!(
        "drawtext=text='{}':fontcolor=white:fontsize={}:borderw=3:bordercolor=black:\
         box=1:boxcolor=black@0.4:boxborderw=16:line_spacing=12:\
         x=(w-text_w)/2:y=h-text_h-{}",
        escaped, style.font_size, style.bottom_margin
    );

    if let Some(ref font_file) = style.font_file {
        filter.push_str(":fontfile=");
        filter.push_str(font_file);
    }

    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_fill_filter() {
        let filter = vertical_fill_filter(1080, 1920);
        assert_eq!(
            filter,
            "scale=1080:1920:force_original_aspect_ratio=increase,crop=1080:1920"
        );
    }

    #[test]
    fn test_wrap_caption_respects_line_length() {
        let wrapped = wrap_caption("the quick brown fox jumps over the lazy dog", 15);
        for line in wrapped.lines() {
            assert!(line.len() <= 15, "line too long: {:?}", line);
        }
        assert_eq!(
            wrapped.split_whitespace().collect::<Vec<_>>().join(" "),
            "the quick brown fox jumps over the lazy dog"
        );
    }

    #[test]
    fn test_wrap_caption_counts_characters_not_bytes() {
        // Each word is 7 characters but more bytes; two must still fit
        // on a 15-character line.
        let wrapped = wrap_caption("généré général téléphoné", 15);
        let lines: Vec<_> = wrapped.lines().collect();
        assert_eq!(lines[0], "généré général");
        for line in &lines {
            assert!(line.chars().count() <= 15, "line too wide: {:?}", line);
        }
    }

    #[test]
    fn test_wrap_caption_keeps_long_word_whole() {
        let wrapped = wrap_caption("hi supercalifragilistic", 10);
        assert_eq!(wrapped, "hi\nsupercalifragilistic");
    }

    #[test]
    fn test_caption_filter_escapes_special_chars() {
        let style = CaptionStyle {
            font_file: None,
            ..Default::default()
        };
        let filter = caption_filter("it's 100%: done", &style);
        assert!(filter.contains("\\'"));
        assert!(filter.contains("\\%"));
        assert!(filter.contains("\\:"));
        assert!(filter.starts_with("drawtext=text='"));
    }

    #[test]
    fn test_caption_filter_geometry() {
        let style = CaptionStyle {
            font_size: 48,
            max_line_chars: 20,
            bottom_margin: 200,
            font_file: None,
        };
        let filter = caption_filter("Hello world", &style);
        assert!(filter.contains("fontsize=48"));
        assert!(filter.contains("x=(w-text_w)/2"));
        assert!(filter.contains("y=h-text_h-200"));
    }
}
