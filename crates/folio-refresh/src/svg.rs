//! SVG cards for the GitHub profile widgets.

use std::fmt::Write as _;

use folio_core::{GithubUserStats, LanguageShare};

const FONT: &str = "'Roboto', -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif";
const CARD_BG: &str = "#f5f5f5";
const CARD_BORDER: &str = "#e5e5e5";
const BORDER_RADIUS: u32 = 12;
const TEXT_PRIMARY: &str = "#000000";
const TEXT_SECONDARY: &str = "#525252";
const ICON_COLOR: &str = "#737373";

const PADDING: u32 = 20;
const HEADER_HEIGHT: u32 = 32;
const CARD_WIDTH: u32 = 320;

const STAR_ICON: &str = r#"<svg class="icon" viewBox="0 0 16 16" width="16" height="16"><path d="M8 .25a.75.75 0 0 1 .673.418l1.882 3.815 4.21.612a.75.75 0 0 1 .416 1.279l-3.046 2.97.719 4.192a.75.75 0 0 1-1.088.791L8 12.347l-3.766 1.98a.75.75 0 0 1-1.088-.79l.72-4.194L.818 6.374a.75.75 0 0 1 .416-1.28l4.21-.611L7.327.668A.75.75 0 0 1 8 .25z"/></svg>"#;
const COMMIT_ICON: &str = r#"<svg class="icon" viewBox="0 0 16 16" width="16" height="16"><path d="M11.93 8.5a4.002 4.002 0 0 1-7.86 0H.75a.75.75 0 0 1 0-1.5h3.32a4.002 4.002 0 0 1 7.86 0h3.32a.75.75 0 0 1 0 1.5Zm-1.43-.5a2.5 2.5 0 1 0-5 0 2.5 2.5 0 0 0 5 0Z"/></svg>"#;
const PR_ICON: &str = r#"<svg class="icon" viewBox="0 0 16 16" width="16" height="16"><path d="M1.5 3.25a2.25 2.25 0 1 1 3 2.122v5.256a2.251 2.251 0 1 1-1.5 0V5.372A2.25 2.25 0 0 1 1.5 3.25Zm5.677-.177L9.573.677A.25.25 0 0 1 10 .854V2.5h1A2.5 2.5 0 0 1 13.5 5v5.628a2.251 2.251 0 1 1-1.5 0V5a1 1 0 0 0-1-1h-1v1.646a.25.25 0 0 1-.427.177L7.177 3.427a.25.25 0 0 1 0-.354ZM3.75 2.5a.75.75 0 1 0 0 1.5.75.75 0 0 0 0-1.5Zm0 9.5a.75.75 0 1 0 0 1.5.75.75 0 0 0 0-1.5Zm8.25.75a.75.75 0 1 0 1.5 0 .75.75 0 0 0-1.5 0Z"/></svg>"#;

/// Compact display form: `950`, `1.2K`, `3.4M`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// "GitHub Stats" card with star, commit, and pull request rows.
#[must_use]
pub fn render_stats_card(stats: &GithubUserStats) -> String {
    const ROW_HEIGHT: u32 = 36;
    let items = [
        (STAR_ICON, "Stars", stats.stars),
        (COMMIT_ICON, "Commits", stats.commits),
        (PR_ICON, "PRs", stats.prs),
    ];
    let rows_len = u32::try_from(items.len()).unwrap_or(u32::MAX);
    let card_height = PADDING + HEADER_HEIGHT + rows_len * ROW_HEIGHT + PADDING;
    let value_x = CARD_WIDTH - PADDING * 2;

    let mut rows = String::new();
    for (i, (icon, label, value)) in (0u32..).zip(items) {
        let _ = write!(
            rows,
            r#"
    <g transform="translate({PADDING}, {y})">
      <g transform="translate(0, 0)">{icon}</g>
      <text x="28" y="13" class="stat-label">{label}</text>
      <text x="{value_x}" y="13" class="stat-value" text-anchor="end">{value}</text>
    </g>"#,
            y = PADDING + HEADER_HEIGHT + i * ROW_HEIGHT,
            value = format_number(value),
        );
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CARD_WIDTH}" height="{card_height}" viewBox="0 0 {CARD_WIDTH} {card_height}">
  <style>
    .card-title {{ font: 700 15px {FONT}; fill: {TEXT_PRIMARY}; }}
    .stat-label {{ font: 500 13px {FONT}; fill: {TEXT_SECONDARY}; }}
    .stat-value {{ font: 700 13px {FONT}; fill: {TEXT_PRIMARY}; }}
    .icon {{ fill: {ICON_COLOR}; }}
  </style>
  {frame}
  <text x="{PADDING}" y="{title_y}" class="card-title">GitHub Stats</text>
  {rows}
</svg>"#,
        frame = frame(card_height),
        title_y = PADDING + 14,
    )
}

/// "Top Languages" card: a clipped segmented bar plus a legend.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn render_languages_card(languages: &[LanguageShare]) -> String {
    const BAR_HEIGHT: u32 = 8;
    const BAR_GAP: u32 = 20;
    const ROW_HEIGHT: u32 = 28;
    let bar_width = CARD_WIDTH - PADDING * 2;
    let bar_y = PADDING + HEADER_HEIGHT;
    let rows_len = u32::try_from(languages.len()).unwrap_or(u32::MAX);
    let card_height = PADDING + HEADER_HEIGHT + BAR_HEIGHT + BAR_GAP + rows_len * ROW_HEIGHT + PADDING;

    let mut segments = String::new();
    let mut x = f64::from(PADDING);
    for lang in languages {
        let pct = lang.percentage.parse::<f64>().unwrap_or(0.0);
        let width = pct / 100.0 * f64::from(bar_width);
        let _ = write!(
            segments,
            r#"<rect x="{x}" y="{bar_y}" width="{width}" height="{BAR_HEIGHT}" fill="{color}"/>"#,
            color = escape(&lang.color),
        );
        x += width;
    }

    let legend_y = bar_y + BAR_HEIGHT + BAR_GAP;
    let value_x = CARD_WIDTH - PADDING * 2;
    let mut legend = String::new();
    for (i, lang) in (0u32..).zip(languages) {
        let _ = write!(
            legend,
            r#"
    <g transform="translate({PADDING}, {y})">
      <circle cx="6" cy="7" r="5" fill="{color}"/>
      <text x="18" y="11" class="lang-name">{name}</text>
      <text x="{value_x}" y="11" class="lang-pct" text-anchor="end">{pct}%</text>
    </g>"#,
            y = legend_y + i * ROW_HEIGHT,
            color = escape(&lang.color),
            name = escape(&lang.name),
            pct = escape(&lang.percentage),
        );
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CARD_WIDTH}" height="{card_height}" viewBox="0 0 {CARD_WIDTH} {card_height}">
  <style>
    .card-title {{ font: 700 15px {FONT}; fill: {TEXT_PRIMARY}; }}
    .lang-name {{ font: 500 13px {FONT}; fill: {TEXT_SECONDARY}; }}
    .lang-pct {{ font: 700 13px {FONT}; fill: {TEXT_PRIMARY}; }}
  </style>
  {frame}
  <text x="{PADDING}" y="{title_y}" class="card-title">Top Languages</text>
  <defs>
    <clipPath id="bar-clip"><rect x="{PADDING}" y="{bar_y}" width="{bar_width}" height="{BAR_HEIGHT}" rx="4" fill="white"/></clipPath>
  </defs>
  <g clip-path="url(#bar-clip)">{segments}</g>
  {legend}
</svg>"#,
        frame = frame(card_height),
        title_y = PADDING + 14,
    )
}

fn frame(card_height: u32) -> String {
    format!(
        r#"<rect x="0.5" y="0.5" rx="{BORDER_RADIUS}" width="{w}" height="{h}" fill="{CARD_BG}" stroke="{CARD_BORDER}"/>"#,
        w = CARD_WIDTH - 1,
        h = card_height - 1,
    )
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(name: &str, percentage: &str, color: &str) -> LanguageShare {
        LanguageShare {
            name: name.to_owned(),
            percentage: percentage.to_owned(),
            color: color.to_owned(),
        }
    }

    #[test]
    fn format_number_compacts_large_values() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1.0K");
        assert_eq!(format_number(1_234), "1.2K");
        assert_eq!(format_number(3_400_000), "3.4M");
    }

    #[test]
    fn stats_card_lists_three_rows() {
        let svg = render_stats_card(&GithubUserStats {
            stars: 42,
            commits: 1_500,
            prs: 7,
        });
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"height="180""#));
        assert!(svg.contains("GitHub Stats"));
        assert!(svg.contains(">42</text>"));
        assert!(svg.contains(">1.5K</text>"));
        assert!(svg.contains(">PRs</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn languages_card_draws_segment_and_legend_per_language() {
        let svg = render_languages_card(&[
            share("Dart", "75.0", "#00B4AB"),
            share("C++", "25.0", "#f34b7d"),
        ]);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(r##"<rect x="20" y="52" width="210" height="8" fill="#00B4AB"/>"##));
        assert!(svg.contains(r##"<rect x="230" y="52" width="70" height="8" fill="#f34b7d"/>"##));
        assert!(svg.contains(">75.0%</text>"));
        assert!(svg.contains("clip-path=\"url(#bar-clip)\""));
    }

    #[test]
    fn language_names_are_escaped() {
        let svg = render_languages_card(&[share("<script>", "100.0", "#858585")]);
        assert!(svg.contains("&lt;script&gt;"));
        assert!(!svg.contains("<script>"));
    }
}
