//! Plain-text rendering of the detail view and member lists.

use std::fmt::Write;

use cheongyak_core::detail::{InfraEntry, SubscriptionDetailView};
use cheongyak_core::price::{DEAL_COUNT_SERIES, PRICE_PER_AR_SERIES};
use cheongyak_core::utils::{format_distance, format_number, truncate_string};
use cheongyak_core::{DetailTab, InterestRegion};

/// Width of the D-day progress bar in cells.
const PROGRESS_BAR_WIDTH: usize = 20;

/// Width of the longest deal-count bar on the chart tab.
const CHART_BAR_WIDTH: usize = 24;

/// Names longer than this are truncated in list output.
const MAX_NAME_LENGTH: usize = 40;

fn bar(filled: usize, width: usize) -> String {
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Header card: name, address, reception period and D-day.
pub fn render_header(view: &SubscriptionDetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.name);
    let _ = writeln!(out, "  {}", view.address);
    let _ = writeln!(out, "  청약 기간  {}", view.reception_period);

    let percent = view.deadline.progress_percent();
    let filled = ((percent / 100.0) * PROGRESS_BAR_WIDTH as f64).round() as usize;
    let _ = writeln!(
        out,
        "  {}  {} {:.0}%",
        view.deadline.label(),
        bar(filled, PROGRESS_BAR_WIDTH),
        percent
    );

    let _ = write!(out, "  [{}]", view.like_action.label());
    match (&view.announcement_url, view.can_open_announcement()) {
        (Some(url), true) => {
            let _ = writeln!(out, "  {}: {}", view.deadline.action_label(), url);
        }
        _ => {
            let _ = writeln!(out, "  {}", view.deadline.action_label());
        }
    }
    out
}

/// Tab strip with the current tab bracketed.
pub fn render_tabs(current: DetailTab) -> String {
    DetailTab::ALL
        .iter()
        .map(|tab| {
            if *tab == current {
                format!("[{}]", tab.title())
            } else {
                tab.title().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn render_tab(view: &SubscriptionDetailView, tab: DetailTab) -> String {
    match tab {
        DetailTab::Common => render_common(view),
        DetailTab::Price => render_price(view),
        DetailTab::Chart => render_chart(view),
        DetailTab::Special => render_special(view),
        DetailTab::Schedule => render_schedule(view),
    }
}

/// Header, tab strip and the selected tab.
pub fn render_detail(view: &SubscriptionDetailView, tab: DetailTab) -> String {
    format!(
        "{}\n{}\n\n{}",
        render_header(view),
        render_tabs(tab),
        render_tab(view, tab)
    )
}

fn render_infra_entry(out: &mut String, entry: &InfraEntry) {
    let _ = writeln!(
        out,
        "    [{}] {} {}",
        entry.badge,
        entry.name,
        format_distance(entry.distance.as_deref())
    );
}

fn render_common(view: &SubscriptionDetailView) -> String {
    let o = &view.overview;
    let mut out = String::new();
    let _ = writeln!(out, "공급 개요");
    let _ = writeln!(out, "  총 세대수    {} 세대", format_number(o.total));
    let _ = writeln!(out, "  일반 공급    {} 세대", format_number(o.normal));
    let _ = writeln!(out, "  특별 공급    {} 세대", format_number(o.special));
    let _ = writeln!(out, "  공급 유형    {} {}", o.rent_type, o.house_detail_type);
    let _ = writeln!(out, "  입주 예정    {}", o.move_in_month);
    let _ = writeln!(out, "  시행사       {}", o.developer);
    let _ = writeln!(out, "  시공사       {}", o.constructor);

    let _ = writeln!(out, "\n주변 학교");
    for school in &view.infra.schools {
        render_infra_entry(&mut out, school);
    }
    let _ = writeln!(out, "\n주변 역");
    for station in &view.infra.stations {
        render_infra_entry(&mut out, station);
    }
    out
}

fn render_price(view: &SubscriptionDetailView) -> String {
    if view.price_rows.is_empty() {
        return "가격 정보가 없습니다.\n".to_string();
    }
    let mut out = String::new();
    for row in &view.price_rows {
        let _ = writeln!(out, "{}  ({}세대)", row.housing_type, row.households);
        let _ = writeln!(
            out,
            "  전용면적 {} ㎡ | 분양가 {} 만원 | 일반 공급 {} 세대 | 특별 공급 {} 세대",
            row.area, row.price, row.normal_count, row.special_count
        );
    }
    out
}

fn render_chart(view: &SubscriptionDetailView) -> String {
    if view.chart.is_empty() {
        return "실거래 데이터가 없습니다.\n".to_string();
    }
    let max_count = view.chart.iter().map(|p| p.deal_count).max().unwrap_or(0).max(1);
    let mut out = String::new();
    for point in &view.chart {
        let ratio = point.deal_count.max(0) as f64 / max_count as f64;
        let filled = (ratio * CHART_BAR_WIDTH as f64).floor() as usize;
        let price = point
            .price_per_ar
            .map(|p| format_number(p.round() as i64))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:>4} {} {}: {}{} | {}: {}{}",
            point.month_label,
            bar(filled, CHART_BAR_WIDTH),
            DEAL_COUNT_SERIES.label,
            point.deal_count,
            DEAL_COUNT_SERIES.unit,
            PRICE_PER_AR_SERIES.label,
            price,
            PRICE_PER_AR_SERIES.unit
        );
    }
    out
}

fn render_special(view: &SubscriptionDetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "특별공급 세대수");
    let visible = view.special_supply.visible_categories();
    if visible.is_empty() {
        let _ = writeln!(out, "  특별공급 세대가 없습니다.");
    }
    for category in visible {
        let _ = writeln!(out, "  {}  {} 세대", category.title(), category.count);
    }
    let _ = writeln!(
        out,
        "\n특별공급 신청자격 및 당첨자 선정방법 등 구체적인 사항은 공고문을 통해 반드시 확인하시기 바랍니다."
    );
    if let Some(ref url) = view.announcement_url {
        let _ = writeln!(out, "  공고문: {}", url);
    }
    out
}

fn render_schedule(view: &SubscriptionDetailView) -> String {
    let mut out = String::new();
    for (index, milestone) in view.schedule.iter().enumerate() {
        let marker = if milestone.status.is_reached() { "●" } else { "○" };
        let _ = writeln!(
            out,
            "{} {}. {}  {}  [{}]",
            marker,
            index + 1,
            milestone.title(),
            milestone.date_label(),
            milestone.status.label()
        );
        let _ = writeln!(out, "     {}", milestone.kind.description());
    }
    out
}

/// Interest region table, with a hint when more can be added.
pub fn render_regions(regions: &[InterestRegion], can_add: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "나의 관심 지역 목록");
    if regions.is_empty() {
        let _ = writeln!(out, "  등록된 관심 지역이 없습니다.");
    }
    for (index, region) in regions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} {}", index + 1, region.city, region.district);
    }
    if can_add {
        let _ = writeln!(out, "\n`cheongyak regions add <시/도> <군/구>`로 추가할 수 있습니다.");
    }
    let _ = writeln!(out, "최대 5개까지 등록할 수 있습니다.");
    out
}

/// Numbered list of names.
pub fn render_names(names: &[String]) -> String {
    let mut out = String::new();
    for (index, name) in names.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", index + 1, truncate_string(name, MAX_NAME_LENGTH));
    }
    out
}
