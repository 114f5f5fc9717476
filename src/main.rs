// Entry point and high-level CLI flow.
//
// - Option [1] loads the country, sector and forecast tables and derives the
//   country metrics, printing diagnostics.
// - Option [2] writes the report tables and a JSON summary.
// - After generating reports, the user can go back to the selection menu or
//   exit.
use aidgap_report::config::Config;
use aidgap_report::forecast::{RISK_COLLAPSE_SLOTS, RISK_UNDERFUNDED_SLOTS};
use aidgap_report::session::Session;
use aidgap_report::util::format_int;
use aidgap_report::{output, reports, ReportError, ReportResult};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

// In-memory app state so the CSVs are parsed once but reports can be generated
// many times in a single run. The session cache skips recomputation when the
// country table is unchanged between loads.
static APP_STATE: Lazy<Mutex<Session>> = Lazy::new(|| Mutex::new(Session::new()));

fn state() -> MutexGuard<'static, Session> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Ask whether to go back to the report selection menu. End of input counts
/// as `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(resp) = read_line("Back to Report Selection (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load every table and derive the country metrics.
fn handle_load(cfg: &Config) -> ReportResult<()> {
    let mut state = state();
    let data = state.reload(cfg)?;
    let load = &data.load_report;
    let dropped = &data.derivation.dropped;
    println!(
        "Processing dataset... ({} rows read, {} countries with complete data)",
        format_int(load.total_rows),
        format_int(data.derivation.metrics.len())
    );
    println!(
        "Note: {} rows skipped ({} duplicate, {} missing fields, {} invalid values, {} unreadable).",
        format_int(dropped.total() + load.parse_errors),
        format_int(dropped.duplicates),
        format_int(dropped.missing_field),
        format_int(dropped.invalid_value),
        format_int(load.parse_errors)
    );
    println!(
        "Info: {} sectors, {} forecast rows.\n",
        format_int(data.sectors.len()),
        format_int(data.forecasts.as_ref().map_or(0, Vec::len))
    );
    Ok(())
}

/// Handle option [2]: write every report and the JSON summary, printing
/// Markdown previews along the way.
fn handle_generate_reports(cfg: &Config) -> ReportResult<()> {
    let data = state().data()?.clone();
    let metrics = &data.derivation.metrics;

    println!("Generating reports...");
    println!("Outputs saved to individual files...\n");

    let file0 = cfg.out_path("country_metrics.csv");
    output::write_csv(&file0, metrics)?;

    let r1 = reports::mismatch_leaderboard(metrics, cfg.top_n);
    let file1 = cfg.out_path("report1_mismatch_leaderboard.csv");
    output::write_csv(&file1, &r1)?;
    println!("Report 1: Mismatch Leaderboard");
    println!("(Top {} Overlooked Countries)\n", cfg.top_n);
    output::preview_table_rows(&r1, cfg.preview_rows);
    println!("(Full table exported to {})\n", file1.display());

    let r2 = reports::sector_coverage(&data.sectors, cfg.top_n);
    let file2 = cfg.out_path("report2_sector_coverage.csv");
    output::write_csv(&file2, &r2)?;
    println!("Report 2: Sectoral Coverage Gaps");
    println!("(Top {} Sectors by People in Need)\n", cfg.top_n);
    output::preview_table_rows(&r2, cfg.preview_rows);
    println!("(Full table exported to {})\n", file2.display());

    if let Some(forecasts) = &data.forecasts {
        let r3 = reports::forecast_gaps(
            forecasts,
            cfg.forecast_year,
            RISK_COLLAPSE_SLOTS,
            RISK_UNDERFUNDED_SLOTS,
        );
        let file3 = cfg.out_path("report3_forecast_gaps.csv");
        output::write_csv(&file3, &r3)?;
        println!("Report 3: Projected Funding Gaps");
        println!("(High Neglect Risk Countries, {})\n", cfg.forecast_year);
        output::preview_table_rows(&r3, cfg.preview_rows);
        println!("(Full table exported to {})\n", file3.display());

        let r4 = reports::funding_trajectories(forecasts);
        let file4 = cfg.out_path("report4_funding_trajectories.csv");
        output::write_csv(&file4, &r4)?;
        println!("Report 4: Funding Trajectories");
        println!("(Deepest Collapses and Best Funded Countries)\n");
        output::preview_table_rows(&r4, cfg.preview_rows);
        println!("(Full table exported to {})\n", file4.display());
    }

    let summary = reports::generate_summary(
        metrics,
        &data.derivation.dropped,
        &data.sectors,
        data.forecasts.as_deref(),
    );
    output::write_json(&cfg.out_path("summary.json"), &summary)?;
    println!("Summary Stats (summary.json):");
    println!(
        "{{\"countries_analyzed\": {}, \"critical\": {}, \"most_overlooked\": \"{}\"}}\n",
        summary.metrics.countries_analyzed,
        summary.metrics.critical_count,
        summary.metrics.most_overlooked.as_deref().unwrap_or("-")
    );
    Ok(())
}

fn main() -> ReportResult<()> {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    let cfg = Config::from_args(&args);
    std::fs::create_dir_all(&cfg.out_dir)?;
    log::info!("data dir {}, output dir {}", cfg.data_dir.display(), cfg.out_dir.display());

    loop {
        println!("Select Option:");
        println!("[1] Load the data");
        println!("[2] Generate Reports\n");
        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => {
                if let Err(e) = handle_load(&cfg) {
                    eprintln!("Failed to load data: {}\n", e);
                }
            }
            "2" => {
                println!();
                match handle_generate_reports(&cfg) {
                    Err(ReportError::NoData) => {
                        println!("Error: No data loaded. Please load the data first (option 1).\n");
                        continue;
                    }
                    Err(e) => eprintln!("Write error: {}\n", e),
                    Ok(()) => {}
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
    Ok(())
}
