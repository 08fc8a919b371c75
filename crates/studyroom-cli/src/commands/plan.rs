use chrono::{Local, NaiveTime};
use serde::Serialize;
use studyroom_core::plan::parse_time_of_day;
use studyroom_core::{Config, DailyPlan, PlanItem, SlotStatus};

#[derive(Serialize)]
struct PlanRow<'a> {
    #[serde(flatten)]
    item: &'a PlanItem,
    status: SlotStatus,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    at: NaiveTime,
    items: Vec<PlanRow<'a>>,
    tomorrow_focus: Option<&'a str>,
}

pub fn run(at: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let now = match at {
        Some(s) => parse_time_of_day(s)?,
        None => Local::now().time(),
    };
    let config = Config::load()?;
    let plan = DailyPlan::generate(&config.registry());

    if json {
        let out = PlanOutput {
            at: now,
            items: plan
                .items
                .iter()
                .map(|item| PlanRow {
                    item,
                    status: item.status_at(now),
                })
                .collect(),
            tomorrow_focus: plan.tomorrow_focus.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if plan.is_empty() {
        println!("Nothing planned. Add subjects to get a daily plan.");
        return Ok(());
    }
    for item in &plan.items {
        let marker = match item.status_at(now) {
            SlotStatus::Past => "done",
            SlotStatus::Current => "now",
            SlotStatus::Upcoming => "",
        };
        println!(
            "{}  {:<24} {:>2} min  {:<8} {marker}",
            item.start.format("%H:%M"),
            item.subject,
            item.duration_min,
            item.kind.label(),
        );
    }
    if let Some(name) = &plan.tomorrow_focus {
        println!();
        println!("Tomorrow: start with {name} in the morning.");
    }
    Ok(())
}
