//! HTML Fragments
//!
//! /create 返回给 htmx 的片段；所有动态文本都经过转义

use std::time::Duration;

/// 转义 HTML 特殊字符
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 保留时长的可读形式，如 "1 hour"、"90 minutes"
pub fn describe_retention(max_age: Duration) -> String {
    let secs = max_age.as_secs();
    let (value, unit) = if secs >= 3600 && secs % 3600 == 0 {
        (secs / 3600, "hour")
    } else if secs >= 60 && secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };

    if value == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

/// 成功片段：生成的文本 + 音频播放器
pub fn story_fragment(narrative: &str, audio_url: &str, retention: Option<Duration>) -> String {
    let notice = match retention {
        Some(max_age) => format!(
            r#"
    <div class="text-sm text-gray-500 mt-2">
        <i class="fas fa-info-circle mr-1"></i> Audio will be automatically deleted after {}
    </div>"#,
            describe_retention(max_age)
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="space-y-4 p-4 bg-gray-50 rounded-lg">
    <div class="text-gray-700 mb-2">
        <span class="font-medium">Generated Text:</span>
        <p class="mt-1">{text}</p>
    </div>
    <div class="audio-player bg-white p-3 rounded-lg shadow-sm border border-gray-200">
        <audio controls class="w-full" onerror="this.parentElement.innerHTML='<p class=\'text-red-500\'>Failed to load audio</p>'">
            <source src="{src}" type="audio/mpeg">
            Your browser does not support the audio element.
        </audio>
    </div>{notice}
</div>
"#,
        text = escape_html(narrative),
        src = escape_html(audio_url),
        notice = notice,
    )
}

/// 错误片段
pub fn error_fragment(message: &str) -> String {
    format!(
        r#"<div class="text-red-600">{}</div>"#,
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&#34;x&#34;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("She listened as he spoke."), "She listened as he spoke.");
    }

    #[test]
    fn test_describe_retention() {
        assert_eq!(describe_retention(Duration::from_secs(3600)), "1 hour");
        assert_eq!(describe_retention(Duration::from_secs(86400)), "24 hours");
        assert_eq!(describe_retention(Duration::from_secs(5400)), "90 minutes");
        assert_eq!(describe_retention(Duration::from_secs(45)), "45 seconds");
    }

    #[test]
    fn test_story_fragment_escapes_text() {
        let html = story_fragment("<b>hi</b>", "/audio/abc.mp3", None);
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(!html.contains("<b>hi</b>"));
        assert!(html.contains(r#"<source src="/audio/abc.mp3" type="audio/mpeg">"#));
        assert!(!html.contains("automatically deleted"));
    }

    #[test]
    fn test_story_fragment_retention_notice() {
        let html = story_fragment("text", "/audio/abc.mp3", Some(Duration::from_secs(3600)));
        assert!(html.contains("Audio will be automatically deleted after 1 hour"));
    }

    #[test]
    fn test_error_fragment() {
        assert_eq!(
            error_fragment("Failed to save audio"),
            r#"<div class="text-red-600">Failed to save audio</div>"#
        );
    }
}
