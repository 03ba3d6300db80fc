mod global {
    turf::style_sheet!("assets/global.css");
}

mod breadcrumbs {
    turf::style_sheet!("assets/breadcrumbs.css");
}

mod stats {
    turf::style_sheet!("assets/stats.css");
}

mod vehicle_list {
    turf::style_sheet!("assets/vehicle_list.css");
}

mod charts {
    turf::style_sheet!("assets/charts.css");
}

mod records {
    turf::style_sheet!("assets/records.css");
}

mod forms {
    turf::style_sheet!("assets/forms.css");
}

pub use breadcrumbs::ClassName as Breadcrumbs;
pub use charts::ClassName as Charts;
pub use forms::ClassName as Forms;
pub use global::ClassName as Global;
pub use records::ClassName as Records;
pub use stats::ClassName as Stats;
pub use vehicle_list::ClassName as VehicleList;

use std::sync::LazyLock;

pub static ALL: LazyLock<String> = LazyLock::new(|| {
    [
        global::STYLE_SHEET,
        breadcrumbs::STYLE_SHEET,
        stats::STYLE_SHEET,
        vehicle_list::STYLE_SHEET,
        charts::STYLE_SHEET,
        records::STYLE_SHEET,
        forms::STYLE_SHEET,
    ]
    .join("\n")
});
