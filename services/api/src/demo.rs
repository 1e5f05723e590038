use crate::infra::{build_services, seed_demo_data, Stores};
use chrono::Utc;
use clap::Args;
use seminar_portal::config::AttachmentConfig;
use seminar_portal::error::AppError;
use seminar_portal::portal::catalog::AttachmentUpload;
use seminar_portal::portal::directory::UserProfile;
use seminar_portal::portal::registration::SeminarStatus;
use seminar_portal::portal::store::RepositoryError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip printing the applicant roster CSV export.
    #[arg(long)]
    pub(crate) skip_export: bool,
    /// Also upload a sample agenda attachment to the demo seminar.
    #[arg(long)]
    pub(crate) include_attachments: bool,
}

fn profile_of(stores: &Stores, username: &str) -> Result<UserProfile, AppError> {
    use seminar_portal::portal::directory::UserRepository;
    stores
        .users
        .by_username(username)?
        .map(|record| record.profile)
        .ok_or(AppError::Store(RepositoryError::NotFound))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let stores = Stores::new();
    let services = build_services(&stores, AttachmentConfig::default());
    seed_demo_data(&stores, &services)?;

    let now = Utc::now();
    let admin = profile_of(&stores, "admin")?;
    let employee = profile_of(&stores, "user")?;

    println!("Seminar registration portal demo");
    println!("\nSeminar catalog (as seen by {}):", employee.full_name);
    let catalog = services.catalog.list(&employee, now)?;
    for seminar in &catalog {
        println!(
            "- [{}] {} | {} | {}명 신청",
            seminar.status_label,
            seminar.title,
            seminar.date.format("%Y-%m-%d %H:%M"),
            seminar.application_count
        );
    }

    let Some(open_seminar) = catalog
        .iter()
        .find(|seminar| seminar.status == SeminarStatus::Open)
    else {
        println!("No open seminar available to apply to");
        return Ok(());
    };

    println!("\nApplication workflow");
    let application = match services.registration.apply(&open_seminar.id, &employee, now) {
        Ok(view) => view,
        Err(err) => {
            println!("  Application rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- {} applied to '{}' -> {} ({}명 신청)",
        employee.full_name,
        application.seminar.title,
        application.seminar.status_label,
        application.seminar.application_count
    );

    match services.registration.apply(&open_seminar.id, &employee, now) {
        Ok(_) => println!("  Duplicate application unexpectedly accepted"),
        Err(err) => println!("- Duplicate application rejected: {}", err),
    }

    if args.include_attachments {
        let file_name = "seminar-agenda.pdf";
        let content_type = mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string();
        let batch = services.catalog.attach(
            &open_seminar.id,
            vec![AttachmentUpload {
                file_name: file_name.to_string(),
                content_type: Some(content_type),
                data: b"demo agenda".to_vec(),
            }],
            now,
        )?;
        println!(
            "- Uploaded {} attachment(s), {} rejected",
            batch.uploaded.len(),
            batch.failed.len()
        );
    }

    if !args.skip_export {
        println!("\nApplicant roster export for '{}':", open_seminar.title);
        let csv = services.catalog.applicants_csv(&open_seminar.id)?;
        // Skip the BOM for terminal output.
        print!("{}", String::from_utf8_lossy(&csv[3..]));
    }

    println!("\nDashboard snapshot (as {}):", admin.full_name);
    let stats = services.dashboard.stats(now)?;
    println!(
        "- {} seminars ({} active, {} today) | {} users | {} applications ({} this week)",
        stats.total_seminars,
        stats.active_seminars,
        stats.todays_seminars,
        stats.total_users,
        stats.total_applications,
        stats.weekly_applications
    );
    for stat in services.dashboard.category_stats()? {
        println!("  - {}: {} seminars", stat.name, stat.seminar_count);
    }

    println!("\nCancellation");
    match services
        .registration
        .cancel(&application.id, &employee, now)
    {
        Ok(()) => println!("- Application cancelled; roster and counts updated"),
        Err(err) => println!("- Cancellation rejected: {}", err),
    }
    let stats = services.dashboard.stats(now)?;
    println!("- Applications now: {}", stats.total_applications);

    Ok(())
}
