use std::fmt::Write;

use reel_core::{AppViewModel, HistoryRowView, SearchChipView, Theme, ToastKind, ToastView};

use super::constants::*;

/// Markup for one page region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub target: &'static str,
    pub html: String,
}

impl Fragment {
    fn new(target: &'static str, html: impl Into<String>) -> Self {
        Self {
            target,
            html: html.into(),
        }
    }
}

#[allow(clippy::vec_init_then_push)]
pub fn render(view: &AppViewModel) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    let (root_class, icon) = match view.theme {
        Theme::Light => ("light-theme", "🌙"),
        Theme::Dark => ("", "☀️"),
    };
    fragments.push(Fragment::new(ROOT, format!("class=\"{root_class}\"")));
    fragments.push(Fragment::new(THEME_ICON, icon));

    fragments.push(Fragment::new(TOAST, render_toast(view.toast.as_ref())));
    fragments.push(Fragment::new(
        LOADING,
        match &view.loading_message {
            Some(message) => format!(
                "<div class=\"loading\" style=\"display:flex\"><p>{}</p></div>",
                escape_html(message)
            ),
            None => "<div class=\"loading\" style=\"display:none\"></div>".to_string(),
        },
    ));
    fragments.push(Fragment::new(
        SITE_STATUS,
        match view.site_available {
            Some(true) => "<span class=\"text-green-500\">●</span> Available",
            Some(false) => "<span class=\"text-red-500\">●</span> Unavailable",
            None => "",
        },
    ));
    fragments.push(Fragment::new(
        MODAL,
        match &view.modal {
            // Modal content is page-supplied markup (an embedded player).
            Some(content) => format!("<div class=\"modal\">{content}</div>"),
            None => "<div class=\"modal hidden\"></div>".to_string(),
        },
    ));
    fragments.push(Fragment::new(SETTINGS_PANEL, panel_class(view.settings_open)));
    fragments.push(Fragment::new(HISTORY_PANEL, panel_class(view.history_open)));
    fragments.push(Fragment::new(
        RECENT_SEARCHES,
        render_search_history(&view.search_chips),
    ));
    fragments.push(Fragment::new(
        HISTORY_LIST,
        render_viewing_history(&view.history_rows),
    ));

    fragments
}

fn panel_class(open: bool) -> String {
    if open {
        "class=\"panel show\"".to_string()
    } else {
        "class=\"panel\"".to_string()
    }
}

fn toast_background(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Error => "bg-red-500",
        ToastKind::Success => "bg-green-500",
        ToastKind::Info => "bg-blue-500",
        ToastKind::Warning => "bg-yellow-500",
    }
}

fn render_toast(toast: Option<&ToastView>) -> String {
    match toast {
        Some(toast) => {
            let (opacity, offset) = if toast.leaving {
                ("0", "-100%")
            } else {
                ("1", "0")
            };
            format!(
                "<div class=\"toast {} text-white\" style=\"opacity:{opacity};transform:translateX(-50%) translateY({offset})\"><span id=\"toastMessage\">{}</span></div>",
                toast_background(toast.kind),
                escape_html(&toast.message)
            )
        }
        None => "<div class=\"toast\" style=\"opacity:0\"></div>".to_string(),
    }
}

pub fn render_search_history(chips: &[SearchChipView]) -> String {
    if chips.is_empty() {
        return String::new();
    }

    let mut html = String::from(
        "<div class=\"recent-header\"><div class=\"text-gray-500\">Recent searches:</div>\
         <button id=\"clearHistoryBtn\" aria-label=\"Clear search history\">Clear search history</button></div>",
    );
    for chip in chips {
        let text = escape_html(&chip.text);
        let title = match &chip.searched_at {
            Some(label) => format!(" title=\"Searched {}\"", escape_html(label)),
            None => String::new(),
        };
        let _ = write!(
            html,
            "<button class=\"search-tag\" data-query=\"{text}\"{title}>{text}</button>"
        );
    }
    html
}

pub fn render_viewing_history(rows: &[HistoryRowView]) -> String {
    if rows.is_empty() {
        return "<div class=\"history-empty\">No viewing history yet</div>".to_string();
    }

    let mut html = if rows.len() > HISTORY_PADDING_THRESHOLD {
        String::from("<div class=\"history-items pb-4\">")
    } else {
        String::from("<div class=\"history-items\">")
    };
    for (index, row) in rows.iter().enumerate() {
        html.push_str(&render_history_row(index, row));
    }
    html.push_str("</div>");
    html
}

fn render_history_row(index: usize, row: &HistoryRowView) -> String {
    let source = row
        .source_name
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(escape_html)
        .unwrap_or_else(|| "Unknown source".to_string());

    let progress = match &row.progress {
        Some(progress) => format!(
            "<div class=\"history-progress\"><div class=\"progress-bar\"><div class=\"progress-filled\" style=\"width:{}%\"></div></div><div class=\"progress-text\">{} / {}</div></div>",
            progress.percent, progress.position, progress.duration
        ),
        None => String::new(),
    };

    format!(
        "<div class=\"history-item\" data-index=\"{index}\" data-resume=\"{resume}\">\
         <button class=\"history-delete\" data-url=\"{url}\" title=\"Delete entry\">×</button>\
         <div class=\"history-info\"><div class=\"history-title\">{title}</div>\
         <div class=\"history-meta\"><span class=\"history-episode\">{episode}</span>\
         <span class=\"history-separator\">·</span><span class=\"history-source\">{source}</span></div>\
         {progress}<div class=\"history-time\">{time}</div></div></div>",
        resume = escape_html(&row.resume_url),
        url = escape_html(&row.url),
        title = escape_html(&row.title),
        episode = escape_html(&row.episode_label),
        time = escape_html(&row.time_label),
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
