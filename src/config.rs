use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::FilterSpec;
use crate::data::model::{Disease, EnvFactor, Month};
use crate::state::Selection;

/// Default data file, looked up in the working directory.
pub const DEFAULT_DATA_FILE: &str = "Master_Data_Looker.csv";

/// Command-line options.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "airhealth-dashboard",
    version,
    about = "Explore how air quality relates to health outcome counts"
)]
pub struct Cli {
    /// CSV file with Date, disease count and environmental factor columns
    #[arg(long, env = "HEALTH_DASHBOARD_DATA", default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    /// Only include this calendar year
    #[arg(long)]
    pub year: Option<i32>,

    /// Only include this month (name or number)
    #[arg(long)]
    pub month: Option<Month>,

    /// Disease column to summarize
    #[arg(long, default_value = "Asthma")]
    pub disease: Disease,

    /// Environmental factor column to compare against
    #[arg(long = "env-factor", default_value = "PM25_avg")]
    pub env_factor: EnvFactor,

    /// Print a text report and exit instead of opening the window
    #[arg(long)]
    pub report: bool,
}

impl Cli {
    /// Initial selection described by the flags.
    pub fn selection(&self) -> Selection {
        Selection {
            filter: FilterSpec::new(self.year, self.month),
            disease: self.disease,
            env_factor: self.env_factor,
        }
    }
}
