use serde_json::json;
use studyroom_core::progress::{chart_subjects, SubjectBadge};
use studyroom_core::{Config, DashboardSummary, SubjectStatus, WeekChart};

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let registry = config.registry();
    let summary = DashboardSummary::compute(&registry, config.goals.weekly_goal_minutes);
    // No per-day history is kept; the chart shows the demo week.
    let week = WeekChart::sample();

    if json {
        let out = json!({
            "summary": summary,
            "week": {
                "chart": week,
                "total_hours": week.total_hours(),
                "target_hours": week.target_hours(),
                "progress_pct": week.progress_pct(),
                "rating": week.rating(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Studied {} of {} min this week ({:.1}%)",
        summary.total_studied_minutes, summary.weekly_goal_minutes, summary.weekly_progress_pct
    );
    println!(
        "{} active subjects, {} high priority",
        summary.active_subjects, summary.high_priority_subjects
    );
    println!();
    for s in &summary.subjects {
        let status = match s.status {
            SubjectStatus::OnTrack => "on track",
            SubjectStatus::Steady => "steady",
            SubjectStatus::NeedsAttention => "needs attention",
        };
        println!(
            "{:<24} {:>5.1}/{:<5.1} h  {:>3}%  {status}",
            s.name, s.studied_hours, s.target_hours, s.pct_rounded
        );
    }

    println!();
    println!(
        "Week: {:.1}/{:.1} h ({:.0}%), {}",
        week.total_hours(),
        week.target_hours(),
        week.progress_pct(),
        week.rating().label()
    );
    for (progress, badge) in chart_subjects(&registry) {
        let badge = match badge {
            SubjectBadge::High => "high",
            SubjectBadge::Medium => "medium",
            SubjectBadge::Low => "low",
        };
        println!("  {:<22} {:>3}%  {badge}", progress.name, progress.pct_rounded);
    }
    Ok(())
}
