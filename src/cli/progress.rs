use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Byte-based progress bar for writing `total_bytes` of payload.
pub fn create_progress_bar(multi: &MultiProgress, total_bytes: u64, label: &str) -> Result<ProgressBar> {
    let pb = multi.add(ProgressBar::new(total_bytes));
    pb.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {bytes}/{total_bytes} ({percent}%)\n{msg} | elapsed: {elapsed_precise} | ETA: {eta_precise}",
    )?);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message(label.to_string());
    Ok(pb)
}
