//! Terminal rendering shared by the command handlers

use colored::*;
use glimmer_core::domain::job::{Job, JobStatus};
use glimmer_core::view::{CompletedJobRecord, DashboardStats, JobSummary, ProgressDisplay};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Colorize job status for display
pub fn colorize_status(status: JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Pending | JobStatus::Queued => status_str.yellow(),
        JobStatus::Processing => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
        JobStatus::Unknown => status_str.dimmed(),
    }
}

/// Print a job summary row
pub fn print_job_summary(job: &Job) {
    let summary = JobSummary::from(job);
    let progress = match summary.progress {
        ProgressDisplay::Queued => summary.progress.to_string().yellow(),
        ProgressDisplay::Percent(100) => summary.progress.to_string().green(),
        ProgressDisplay::Percent(_) => summary.progress.to_string().cyan(),
    };

    println!("  {} {} {}", "▸".cyan(), summary.title.bold(), summary.id.dimmed());
    println!("    Status:   {} ({})", colorize_status(summary.status), progress);
    println!("    Homes:    {}", summary.homes);
    println!("    {}", summary.start_text().dimmed());
    println!();
}

/// Print detailed job information
pub fn print_job_details(job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", job.id.cyan());
    println!("  Title:       {}", job.title());
    println!("  Status:      {}", colorize_status(job.status));
    println!(
        "  Progress:    {}/{} ({}%)",
        job.completed(),
        job.total(),
        job.progress_percent()
    );

    if let Some(created) = job.created_at {
        println!("  Created:     {}", created.format(TIME_FORMAT));
    }

    if let Some(completed) = job.completed_at {
        println!("  Completed:   {}", completed.format(TIME_FORMAT));

        if let Some(created) = job.created_at {
            let duration = completed.signed_duration_since(created);
            println!("  Duration:    {}s", duration.num_seconds());
        }
    }
}

/// Print the headline counters
pub fn print_stats(stats: &DashboardStats) {
    println!(
        "{} {}   {} {}   {} {}",
        "Completed:".bold(),
        stats.completed_jobs.to_string().green(),
        "Active:".bold(),
        stats.active_jobs.to_string().cyan(),
        "Flyers:".bold(),
        stats.total_flyers
    );
}

/// Print one completed campaign with its flyers grouped by street
pub fn print_completed_record(job_id: &str, record: &CompletedJobRecord) {
    let completed = record
        .completed_at
        .map(|at| at.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!(
        "{} {} {}",
        "●".green(),
        record.title.bold(),
        format!("({} flyers, completed {})", record.flyer_count(), completed).dimmed()
    );
    println!("  {}", job_id.dimmed());

    for (street, flyers) in &record.streets {
        println!("  {} ({})", street.cyan(), flyers.len());
        for flyer in flyers {
            println!("    {}", flyer.full_address);
            println!("      {}", flyer.image_url.dimmed());
        }
    }
    println!();
}
