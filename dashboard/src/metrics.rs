//! Derived figures for the vehicle pages.
//!
//! Everything here is a pure function of the fetched collections and an
//! explicit `now`, so a page can be recomputed from scratch on every render.
//! Empty inputs always produce zeroed results rather than errors.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use shared::models::{FuelLog, Reminder, ServiceRecord, VehicleStats};

use crate::charts::{self, CalendarMonth};
use crate::config::{
    DAYS_PER_MONTH, DUE_DATE_WARNING, MILEAGE_CRITICAL_DROP_PERCENT, ODOMETER_WARNING_KM,
    TREND_MONTHS,
};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub service: f64,
    pub fuel: f64,
}

impl CostBreakdown {
    pub fn lifetime(&self) -> f64 {
        self.service + self.fuel
    }
}

pub fn cost_breakdown(services: &[ServiceRecord], fuel_logs: &[FuelLog]) -> CostBreakdown {
    CostBreakdown {
        service: services.iter().map(|s| s.cost).sum(),
        fuel: fuel_logs.iter().map(|f| f.total_cost).sum(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CostCategory {
    Fuel,
    Service,
}

impl CostCategory {
    pub fn label(self) -> &'static str {
        match self {
            CostCategory::Fuel => "Fuel",
            CostCategory::Service => "Service",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostSlice {
    pub category: CostCategory,
    pub value: f64,
}

/// Non-zero categories of the breakdown, fuel first.
pub fn cost_distribution(breakdown: &CostBreakdown) -> Vec<CostSlice> {
    [
        CostSlice {
            category: CostCategory::Fuel,
            value: breakdown.fuel,
        },
        CostSlice {
            category: CostCategory::Service,
            value: breakdown.service,
        },
    ]
    .into_iter()
    .filter(|slice| slice.value > 0.0)
    .collect()
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Lifetime cost spread over the months since the earliest record.
///
/// Months are approximated as [`DAYS_PER_MONTH`] days and the divisor never
/// drops below one, so a fortnight of history reports its full spend.
pub fn monthly_average_cost(
    services: &[ServiceRecord],
    fuel_logs: &[FuelLog],
    now: DateTime<Utc>,
) -> f64 {
    let earliest = services
        .iter()
        .map(|s| s.date)
        .chain(fuel_logs.iter().map(|f| f.date))
        .min();
    let Some(earliest) = earliest else {
        return 0.0;
    };

    let elapsed_ms = (now - start_of_day(earliest)).num_milliseconds() as f64;
    let elapsed_months = (elapsed_ms / (DAYS_PER_MONTH as f64 * MILLIS_PER_DAY)).max(1.0);
    cost_breakdown(services, fuel_logs).lifetime() / elapsed_months
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpendBucket {
    pub month: CalendarMonth,
    pub fuel: f64,
    pub service: f64,
}

impl SpendBucket {
    pub fn label(&self) -> &'static str {
        self.month.label()
    }

    pub fn total(&self) -> f64 {
        self.fuel + self.service
    }
}

/// Fuel and service spend for each of the last [`TREND_MONTHS`] calendar months.
pub fn spend_trend(
    services: &[ServiceRecord],
    fuel_logs: &[FuelLog],
    now: DateTime<Utc>,
) -> Vec<SpendBucket> {
    let window = charts::month_window(now.date_naive(), TREND_MONTHS);
    let fuel = charts::aggregate_sum(
        &charts::bucket_by_month(fuel_logs, &window, |f| f.date),
        |f| f.total_cost,
    );
    let service = charts::aggregate_sum(
        &charts::bucket_by_month(services, &window, |s| s.date),
        |s| s.cost,
    );

    fuel.into_iter()
        .zip(service)
        .map(|((month, fuel), (_, service))| SpendBucket {
            month,
            fuel,
            service,
        })
        .collect()
}

/// Only full-tank fills carry a meaningful km/L figure.
fn has_valid_mileage(log: &FuelLog) -> bool {
    log.full_tank && log.mileage > 0.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MileagePoint {
    pub date: NaiveDate,
    pub mileage: f64,
}

/// Efficiency of every full-tank fill, oldest first.
pub fn efficiency_trend(fuel_logs: &[FuelLog]) -> Vec<MileagePoint> {
    let mut points: Vec<MileagePoint> = fuel_logs
        .iter()
        .filter(|f| has_valid_mileage(f))
        .map(|f| MileagePoint {
            date: f.date,
            mileage: f.mileage,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MileageTrend {
    Good,
    Warning,
    Critical,
}

impl MileageTrend {
    pub fn label(self) -> &'static str {
        match self {
            MileageTrend::Good => "Good",
            MileageTrend::Warning => "Slight Drop",
            MileageTrend::Critical => "Significant Drop",
        }
    }
}

/// Classifies `average` against the month it is compared with.
///
/// Both tiers use strict comparisons: a drop of exactly 10% is a warning.
/// The percentage is rounded to six decimals before comparing.
pub fn classify_mileage_change(average: f64, base: f64) -> MileageTrend {
    if average <= 0.0 || base <= 0.0 {
        return MileageTrend::Good;
    }
    let change = ((average - base) * 100.0 / base * 1e6).round() / 1e6;
    if change < MILEAGE_CRITICAL_DROP_PERCENT {
        MileageTrend::Critical
    } else if change < 0.0 {
        MileageTrend::Warning
    } else {
        MileageTrend::Good
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MileageBucket {
    pub month: CalendarMonth,
    pub average: f64,
    pub samples: usize,
    pub trend: MileageTrend,
}

impl MileageBucket {
    pub fn has_data(&self) -> bool {
        self.samples > 0
    }

    pub fn label(&self) -> &'static str {
        self.month.label()
    }
}

/// Average km/L per month over the trend window, each month colored by its
/// change from the month before.
///
/// Months without fills stay in the sequence so the comparison chain keeps
/// its shape; a month following an empty one compares against itself.
pub fn monthly_mileage(fuel_logs: &[FuelLog], now: DateTime<Utc>) -> Vec<MileageBucket> {
    let window = charts::month_window(now.date_naive(), TREND_MONTHS);
    let buckets = charts::bucket_by_month(
        fuel_logs.iter().filter(|f| has_valid_mileage(f)),
        &window,
        |f| f.date,
    );
    let averages = charts::aggregate_average(&buckets, |f| f.mileage);

    averages
        .iter()
        .enumerate()
        .map(|(i, &(month, average, samples))| {
            let base = match i.checked_sub(1).map(|prev| averages[prev]) {
                Some((_, prev_average, prev_samples)) if prev_samples > 0 => prev_average,
                _ => average,
            };
            MileageBucket {
                month,
                average,
                samples,
                trend: classify_mileage_change(average, base),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Urgency {
    Normal,
    Warning,
    Critical,
}

/// Latest odometer reading across both record kinds.
///
/// Each list is searched for its most recent entry by date (ties go to the
/// higher reading) rather than trusting the order the API returned it in.
pub fn current_odometer(services: &[ServiceRecord], fuel_logs: &[FuelLog]) -> u32 {
    let latest_service = services
        .iter()
        .max_by_key(|s| (s.date, s.odometer))
        .map(|s| s.odometer);
    let latest_fuel = fuel_logs
        .iter()
        .max_by_key(|f| (f.date, f.odometer))
        .map(|f| f.odometer);

    latest_service.max(latest_fuel).unwrap_or(0)
}

/// Escalation level of a reminder. Distance and date are judged separately
/// and the more severe verdict wins.
pub fn reminder_urgency(reminder: &Reminder, current_odometer: u32, now: DateTime<Utc>) -> Urgency {
    let by_distance = reminder.due_odometer.map(|due| {
        let remaining = i64::from(due) - i64::from(current_odometer);
        if remaining < 0 {
            Urgency::Critical
        } else if remaining < ODOMETER_WARNING_KM {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    });

    let by_date = reminder.due_date.map(|due| {
        let remaining = start_of_day(due) - now;
        if remaining < chrono::Duration::zero() {
            Urgency::Critical
        } else if remaining < DUE_DATE_WARNING {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    });

    [by_distance, by_date]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(Urgency::Normal)
}

pub fn active_reminders(reminders: &[Reminder]) -> Vec<&Reminder> {
    reminders.iter().filter(|r| !r.is_completed).collect()
}

pub fn average_service_cost(stats: &VehicleStats) -> f64 {
    if stats.total_services == 0 {
        0.0
    } else {
        stats.total_service_cost / stats.total_services as f64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FleetTotals {
    pub total_cost: f64,
    pub total_liters: f64,
    pub total_services: u64,
}

pub fn fleet_totals<'a>(stats: impl IntoIterator<Item = &'a VehicleStats>) -> FleetTotals {
    stats
        .into_iter()
        .fold(FleetTotals::default(), |acc, s| FleetTotals {
            total_cost: acc.total_cost + s.total_cost,
            total_liters: acc.total_liters + s.total_liters,
            total_services: acc.total_services + s.total_services,
        })
}

/// Everything the vehicle page header and analytics tab display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleMetrics {
    pub costs: CostBreakdown,
    pub monthly_cost: f64,
    pub current_odometer: u32,
    pub active_reminders: usize,
    pub spend_trend: Vec<SpendBucket>,
    pub efficiency: Vec<MileagePoint>,
    pub monthly_mileage: Vec<MileageBucket>,
}

impl VehicleMetrics {
    pub fn compute(
        services: &[ServiceRecord],
        fuel_logs: &[FuelLog],
        reminders: &[Reminder],
        now: DateTime<Utc>,
    ) -> Self {
        VehicleMetrics {
            costs: cost_breakdown(services, fuel_logs),
            monthly_cost: monthly_average_cost(services, fuel_logs, now),
            current_odometer: current_odometer(services, fuel_logs),
            active_reminders: active_reminders(reminders).len(),
            spend_trend: spend_trend(services, fuel_logs, now),
            efficiency: efficiency_trend(fuel_logs),
            monthly_mileage: monthly_mileage(fuel_logs, now),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelField {
    Liters,
    Price,
    Total,
}

/// The three linked inputs of the fuel form, each possibly blank.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FuelDraft {
    pub liters: Option<f64>,
    pub price_per_liter: Option<f64>,
    pub total_cost: Option<f64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fills in whichever fuel input the edit made derivable.
///
/// Editing litres or price recomputes the total; otherwise the price or the
/// litres are solved from the remaining pair. With `full_tank` set the litres
/// always follow from total and price. `edited` is `None` when only the
/// full-tank flag changed.
pub fn derive_fuel_draft(draft: FuelDraft, edited: Option<FuelField>, full_tank: bool) -> FuelDraft {
    let mut out = draft;
    let FuelDraft {
        liters,
        price_per_liter: price,
        total_cost: total,
    } = draft;

    match (edited, liters, price, total) {
        (Some(FuelField::Liters | FuelField::Price), Some(l), Some(p), _) => {
            out.total_cost = Some(round2(l * p));
        }
        (Some(FuelField::Liters | FuelField::Total), Some(l), _, Some(t)) if l > 0.0 => {
            out.price_per_liter = Some(round2(t / l));
        }
        (Some(FuelField::Total | FuelField::Price), _, Some(p), Some(t)) if p > 0.0 => {
            out.liters = Some(round2(t / p));
        }
        _ => {}
    }

    if full_tank {
        if let (Some(p), Some(t)) = (out.price_per_liter, out.total_cost) {
            if p > 0.0 {
                out.liters = Some(round2(t / p));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use shared::models::ServiceType;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(day: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
    }

    fn service(day: NaiveDate, odometer: u32, cost: f64) -> ServiceRecord {
        ServiceRecord {
            id: 1,
            vehicle_id: 1,
            date: day,
            odometer,
            cost,
            notes: String::new(),
            service_type: ServiceType::Maintenance,
            document_url: None,
        }
    }

    fn fuel(day: NaiveDate, odometer: u32, total_cost: f64) -> FuelLog {
        FuelLog {
            id: 1,
            vehicle_id: 1,
            date: day,
            odometer,
            liters: 10.0,
            price_per_liter: total_cost / 10.0,
            total_cost,
            full_tank: false,
            notes: String::new(),
            mileage: 0.0,
        }
    }

    fn full_fill(day: NaiveDate, mileage: f64) -> FuelLog {
        FuelLog {
            full_tank: true,
            mileage,
            ..fuel(day, 0, 500.0)
        }
    }

    fn reminder(due_date: Option<NaiveDate>, due_odometer: Option<u32>) -> Reminder {
        Reminder {
            id: 1,
            vehicle_id: 1,
            title: "Oil change".into(),
            due_date,
            due_odometer,
            is_recurring: false,
            interval_km: None,
            interval_months: None,
            notes: String::new(),
            is_completed: false,
            kind: None,
        }
    }

    #[test]
    fn lifetime_sums_both_categories_in_any_order() {
        let today = date(2024, 6, 10);
        let services = vec![service(today, 0, 500.0), service(today, 0, 120.25)];
        let mut logs = vec![fuel(today, 0, 300.0), fuel(today, 0, 79.75)];

        let forward = cost_breakdown(&services, &logs);
        logs.reverse();
        let backward = cost_breakdown(&services, &logs);

        assert_eq!(forward.service, 620.25);
        assert_eq!(forward.fuel, 379.75);
        assert_eq!(forward.lifetime(), 1000.0);
        assert_eq!(forward, backward);
    }

    #[test]
    fn distribution_skips_zero_categories() {
        let only_fuel = CostBreakdown {
            service: 0.0,
            fuel: 12.0,
        };
        let slices = cost_distribution(&only_fuel);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].category, CostCategory::Fuel);
        assert!(cost_distribution(&CostBreakdown::default()).is_empty());
    }

    #[test]
    fn monthly_average_floors_elapsed_months_at_one() {
        let today = date(2024, 6, 10);
        let services = vec![service(today, 0, 500.0)];
        let logs = vec![fuel(today, 0, 300.0)];

        assert_eq!(monthly_average_cost(&services, &logs, noon(today)), 800.0);
    }

    #[test]
    fn monthly_average_divides_by_thirty_day_months() {
        let start = date(2024, 1, 1);
        let now = start_of_day(start) + Duration::days(90);
        let services = vec![service(start, 0, 900.0)];

        let avg = monthly_average_cost(&services, &[], now);
        assert!((avg - 300.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_average_is_zero_without_records() {
        assert_eq!(monthly_average_cost(&[], &[], noon(date(2024, 1, 1))), 0.0);
    }

    #[test]
    fn monthly_average_handles_future_dated_records() {
        let now = noon(date(2024, 1, 1));
        let services = vec![service(date(2024, 3, 1), 0, 250.0)];
        let avg = monthly_average_cost(&services, &[], now);
        assert!(avg.is_finite());
        assert_eq!(avg, 250.0);
    }

    #[test]
    fn spend_trend_always_has_six_buckets() {
        let now = noon(date(2024, 6, 10));
        let empty = spend_trend(&[], &[], now);
        assert_eq!(empty.len(), 6);
        assert!(empty.iter().all(|b| b.fuel == 0.0 && b.service == 0.0));
        assert_eq!(empty[0].label(), "Jan");
        assert_eq!(empty[5].label(), "Jun");
    }

    #[test]
    fn spend_trend_drops_records_outside_window() {
        let now = noon(date(2024, 6, 10));
        // M-7 and next month are both outside the window
        let logs = vec![fuel(date(2023, 11, 20), 0, 400.0), fuel(date(2024, 7, 1), 0, 50.0)];

        let trend = spend_trend(&[], &logs, now);
        assert_eq!(trend.len(), 6);
        assert!(trend.iter().all(|b| b.fuel == 0.0));
    }

    #[test]
    fn spend_trend_splits_fuel_and_service_per_month() {
        let now = noon(date(2024, 6, 10));
        let services = vec![service(date(2024, 1, 31), 0, 1000.0), service(date(2023, 6, 5), 0, 5.0)];
        let logs = vec![fuel(date(2024, 6, 1), 0, 300.0), fuel(date(2024, 6, 9), 0, 200.0)];

        let trend = spend_trend(&services, &logs, now);
        assert_eq!(trend[0].service, 1000.0);
        assert_eq!(trend[5].fuel, 500.0);
        assert_eq!(trend[5].total(), 500.0);
        let total: f64 = trend.iter().map(SpendBucket::total).sum();
        assert_eq!(total, 1500.0);
    }

    #[test]
    fn efficiency_trend_keeps_full_tank_fills_sorted() {
        let logs = vec![
            full_fill(date(2024, 3, 1), 41.0),
            fuel(date(2024, 1, 1), 0, 100.0),
            full_fill(date(2024, 1, 15), 38.5),
            full_fill(date(2024, 2, 1), 0.0),
            FuelLog {
                mileage: 40.0,
                ..fuel(date(2024, 2, 10), 0, 100.0)
            },
        ];

        let points = efficiency_trend(&logs);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, date(2024, 1, 15));
        assert_eq!(points[1].mileage, 41.0);
        assert!(points.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn mileage_change_thresholds_are_strict() {
        assert_eq!(classify_mileage_change(89.0, 100.0), MileageTrend::Critical);
        assert_eq!(classify_mileage_change(90.0, 100.0), MileageTrend::Warning);
        assert_eq!(classify_mileage_change(95.0, 100.0), MileageTrend::Warning);
        assert_eq!(classify_mileage_change(100.0, 100.0), MileageTrend::Good);
        assert_eq!(classify_mileage_change(120.0, 100.0), MileageTrend::Good);
        assert_eq!(classify_mileage_change(0.0, 100.0), MileageTrend::Good);
    }

    #[test]
    fn exact_ten_percent_drop_survives_float_noise() {
        assert_eq!(classify_mileage_change(33.3, 37.0), MileageTrend::Warning);
        assert_eq!(classify_mileage_change(27.9, 31.0), MileageTrend::Warning);
        assert_eq!(classify_mileage_change(33.29, 37.0), MileageTrend::Critical);
    }

    #[test]
    fn monthly_mileage_colors_against_previous_month() {
        let now = noon(date(2024, 6, 10));
        let logs = vec![
            full_fill(date(2024, 3, 5), 40.0),
            full_fill(date(2024, 3, 20), 44.0),
            full_fill(date(2024, 4, 2), 35.0),
            full_fill(date(2024, 5, 2), 34.0),
            full_fill(date(2024, 6, 2), 40.0),
        ];

        let months = monthly_mileage(&logs, now);
        assert_eq!(months.len(), 6);

        let march = months[2];
        assert_eq!(march.label(), "Mar");
        assert_eq!(march.average, 42.0);
        assert_eq!(march.samples, 2);
        // previous month has no fills: compared against itself
        assert_eq!(march.trend, MileageTrend::Good);

        assert_eq!(months[3].trend, MileageTrend::Critical);
        assert_eq!(months[4].trend, MileageTrend::Warning);
        assert_eq!(months[5].trend, MileageTrend::Good);
        assert!(!months[0].has_data());
    }

    #[test]
    fn monthly_mileage_after_gap_is_good() {
        let now = noon(date(2024, 6, 10));
        let logs = vec![full_fill(date(2024, 3, 5), 50.0), full_fill(date(2024, 5, 5), 20.0)];

        let months = monthly_mileage(&logs, now);
        assert!(!months[3].has_data());
        assert_eq!(months[4].trend, MileageTrend::Good);
    }

    #[test]
    fn current_odometer_ignores_list_order() {
        let services = vec![
            service(date(2024, 1, 1), 10_000, 0.0),
            service(date(2024, 5, 1), 14_000, 0.0),
        ];
        let logs = vec![fuel(date(2024, 2, 1), 11_000, 0.0), fuel(date(2024, 6, 1), 15_200, 0.0)];

        assert_eq!(current_odometer(&services, &logs), 15_200);
        assert_eq!(current_odometer(&services, &[]), 14_000);
        assert_eq!(current_odometer(&[], &[]), 0);
    }

    #[test]
    fn reminder_at_due_odometer_is_warning() {
        let now = noon(date(2024, 6, 10));
        assert_eq!(
            reminder_urgency(&reminder(None, Some(15_000)), 15_000, now),
            Urgency::Warning
        );
        assert_eq!(
            reminder_urgency(&reminder(None, Some(15_000)), 15_001, now),
            Urgency::Critical
        );
        assert_eq!(
            reminder_urgency(&reminder(None, Some(15_500)), 15_000, now),
            Urgency::Normal
        );
        assert_eq!(
            reminder_urgency(&reminder(None, Some(15_499)), 15_000, now),
            Urgency::Warning
        );
    }

    #[test]
    fn reminder_date_thresholds() {
        let today = date(2024, 6, 10);
        let now = start_of_day(today);

        assert_eq!(
            reminder_urgency(&reminder(Some(date(2024, 6, 9)), None), 0, now),
            Urgency::Critical
        );
        assert_eq!(
            reminder_urgency(&reminder(Some(date(2024, 6, 23)), None), 0, now),
            Urgency::Warning
        );
        assert_eq!(
            reminder_urgency(&reminder(Some(date(2024, 6, 24)), None), 0, now),
            Urgency::Normal
        );
        assert_eq!(reminder_urgency(&reminder(None, None), 0, now), Urgency::Normal);
    }

    #[test]
    fn critical_wins_regardless_of_source() {
        let now = noon(date(2024, 6, 10));
        // overdue by distance, date merely close
        let r = reminder(Some(date(2024, 6, 15)), Some(900));
        assert_eq!(reminder_urgency(&r, 1_000, now), Urgency::Critical);
        // overdue by date, distance comfortable
        let r = reminder(Some(date(2024, 1, 1)), Some(50_000));
        assert_eq!(reminder_urgency(&r, 1_000, now), Urgency::Critical);
    }

    #[test]
    fn aggregates_of_stats() {
        let a = VehicleStats {
            total_cost: 100.0,
            total_liters: 10.5,
            total_services: 2,
            total_service_cost: 60.0,
            ..VehicleStats::default()
        };
        let b = VehicleStats {
            total_cost: 50.0,
            total_liters: 4.5,
            total_services: 1,
            ..VehicleStats::default()
        };

        let totals = fleet_totals([&a, &b]);
        assert_eq!(totals.total_cost, 150.0);
        assert_eq!(totals.total_liters, 15.0);
        assert_eq!(totals.total_services, 3);
        assert_eq!(fleet_totals(&[]), FleetTotals::default());

        assert_eq!(average_service_cost(&a), 30.0);
        assert_eq!(average_service_cost(&VehicleStats::default()), 0.0);
    }

    #[test]
    fn vehicle_metrics_on_empty_snapshot() {
        let metrics = VehicleMetrics::compute(&[], &[], &[], noon(date(2024, 6, 10)));
        assert_eq!(metrics.costs.lifetime(), 0.0);
        assert_eq!(metrics.monthly_cost, 0.0);
        assert_eq!(metrics.current_odometer, 0);
        assert_eq!(metrics.spend_trend.len(), 6);
        assert!(metrics.efficiency.is_empty());
        assert!(metrics.monthly_mileage.iter().all(|m| !m.has_data()));
    }

    #[test]
    fn completed_reminders_are_not_active() {
        let mut done = reminder(None, None);
        done.is_completed = true;
        let reminders = vec![done, reminder(None, None)];
        assert_eq!(active_reminders(&reminders).len(), 1);
    }

    #[test]
    fn fuel_draft_recomputes_total_from_liters_and_price() {
        let draft = FuelDraft {
            liters: Some(10.0),
            price_per_liter: Some(100.0),
            total_cost: None,
        };
        let out = derive_fuel_draft(draft, Some(FuelField::Price), false);
        assert_eq!(out.total_cost, Some(1000.0));
    }

    #[test]
    fn fuel_draft_solves_price_then_liters() {
        let draft = FuelDraft {
            liters: Some(4.0),
            price_per_liter: None,
            total_cost: Some(410.0),
        };
        assert_eq!(
            derive_fuel_draft(draft, Some(FuelField::Total), false).price_per_liter,
            Some(102.5)
        );

        let draft = FuelDraft {
            liters: None,
            price_per_liter: Some(103.0),
            total_cost: Some(500.0),
        };
        assert_eq!(derive_fuel_draft(draft, Some(FuelField::Total), false).liters, Some(4.85));
    }

    #[test]
    fn fuel_draft_full_tank_follows_total_and_price() {
        let draft = FuelDraft {
            liters: Some(1.0),
            price_per_liter: Some(100.0),
            total_cost: Some(450.0),
        };
        let out = derive_fuel_draft(draft, Some(FuelField::Total), true);
        // price re-solved from litres first, then litres follow the new price
        assert_eq!(out.price_per_liter, Some(450.0));
        assert_eq!(out.liters, Some(1.0));

        let blank = derive_fuel_draft(FuelDraft::default(), Some(FuelField::Liters), true);
        assert_eq!(blank, FuelDraft::default());
    }

    #[test]
    fn toggling_full_tank_only_resolves_liters() {
        let draft = FuelDraft {
            liters: Some(3.0),
            price_per_liter: Some(100.0),
            total_cost: Some(450.0),
        };
        let out = derive_fuel_draft(draft, None, true);
        assert_eq!(out.liters, Some(4.5));
        assert_eq!(out.price_per_liter, Some(100.0));
        assert_eq!(derive_fuel_draft(draft, None, false), draft);
    }
}
