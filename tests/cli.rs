use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const NAME: &str = "airhealth-dashboard";
const HEADER: &str = "Date,Asthma,COPD,Ischemic_heart_disease,Eye_inflammation,Skin_inflammation,PM25_avg,Temp_avg,Wind Speed,Humidity";

fn data_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

fn report(file: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin(NAME).unwrap();
    cmd.env_remove("HEALTH_DASHBOARD_DATA")
        .arg("--report")
        .arg("--data")
        .arg(file.path());
    cmd
}

#[test]
fn report_summarizes_whole_file() {
    let file = data_file(&[
        "2023-01-01,10,1,1,1,1,50,30,2,60",
        "2023-02-01,20,1,1,1,1,80,31,2,",
    ]);

    report(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total cases: 30"))
        .stdout(predicate::str::contains("Average monthly cases: 15"))
        .stdout(predicate::str::contains("Max PM25_avg: 80.00"))
        .stdout(predicate::str::contains("slope 0.3333"))
        .stdout(predicate::str::contains("Correlation matrix:"));
}

#[test]
fn report_with_no_matching_rows_prints_no_data() {
    let file = data_file(&["2023-01-01,10,1,1,1,1,50,30,2,60"]);

    report(&file)
        .args(["--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows: 0"))
        .stdout(predicate::str::contains("Total cases: 0"))
        .stdout(predicate::str::contains("Mean PM25_avg: No data"))
        .stdout(predicate::str::contains("Correlation matrix unavailable"));
}

#[test]
fn report_honours_column_selection() {
    let file = data_file(&[
        "2023-03-01,1,4,1,1,1,50,30,2,60",
        "2023-03-15,1,6,1,1,1,80,31,2,",
        "2023-04-01,1,9,1,1,1,80,31,2,70",
    ]);

    report(&file)
        .args(["--month", "March", "--disease", "COPD", "--env-factor", "Humidity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overview: COPD"))
        .stdout(predicate::str::contains("Total cases: 10"))
        .stdout(predicate::str::contains("Mean Humidity: 60.00"))
        .stdout(predicate::str::contains(
            "Trendline unavailable: needs at least 2 paired observations, found 1",
        ));
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin(NAME)
        .unwrap()
        .env_remove("HEALTH_DASHBOARD_DATA")
        .arg("--report")
        .arg("--data")
        .arg(dir.path().join("nope.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("data file not found"));
}

#[test]
fn wrong_schema_fails() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Asthma").unwrap();
    writeln!(file, "2023-01-01,4").unwrap();

    report(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required columns"))
        .stderr(predicate::str::contains("PM25_avg"));
}

#[test]
fn rejects_unknown_disease() {
    let file = data_file(&[]);
    report(&file)
        .args(["--disease", "Influenza"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown disease"));
}
