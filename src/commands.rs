use std::path::{Path, PathBuf};
use owo_colors::OwoColorize;
use reservations::config::{self, ReservationsConfig};
use reservations::picture::{self, ExportViewer, PictureStatus, PictureViewer, SummaryViewer};
use reservations::ui::{self, Icons, TableBuilder, theme};
use reservations::{
    NationalId, OutputMode, Person, PersonUpdate, Place, PlaceUpdate, SqliteStore, UpdateOutcome,
    emit_success,
};

/// Everything a command needs once the database is open
pub struct Context {
    pub store: SqliteStore,
    pub mode: OutputMode,
    pub picture_dir: PathBuf,
}

pub fn run_version(output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        ui::header(
            Icons::CALENDAR,
            &format!("Reservations {}", env!("CARGO_PKG_VERSION").bold()),
        );
    } else {
        let data = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
        });
        emit_success(output_mode, "version", data)?;
    }
    Ok(())
}

pub fn run_init(
    mode: OutputMode,
    config_path: &Path,
    new_config: &ReservationsConfig,
    database: &Path,
    force: bool,
) -> anyhow::Result<()> {
    config::write_config(config_path, new_config, force)?;
    config::ensure_db_dir(database)?;
    // Opening runs the schema initializer
    drop(SqliteStore::open(database)?);

    if mode.is_human() {
        ui::success(&format!("Wrote {}", config_path.display()));
        ui::info("Database", &database.display().to_string());
    } else {
        emit_success(mode, "init", new_config)?;
    }
    Ok(())
}

pub fn run_add_person(
    ctx: &Context,
    national_id: NationalId,
    first_name: String,
    last_name: String,
    picture: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut person = Person::new(national_id, first_name, last_name);
    if let Some(path) = picture {
        person = person.with_picture(read_picture(&path)?);
    }
    ctx.store.add_person(&person)?;

    if ctx.mode.is_human() {
        ui::success(&format!("Added {} ({})", person.full_name(), national_id));
    } else {
        emit_success(ctx.mode, "add-person", &person)?;
    }
    Ok(())
}

pub fn run_add_place(ctx: &Context, name: String, phone: String, fee: f64) -> anyhow::Result<()> {
    let place = Place::new(name, phone, fee);
    ctx.store.add_place(&place)?;

    if ctx.mode.is_human() {
        ui::success(&format!(
            "Added {} {} ({} per reservation)",
            Icons::PLACE,
            place.name,
            ui::money(place.reservation_fee)
        ));
    } else {
        emit_success(ctx.mode, "add-place", &place)?;
    }
    Ok(())
}

pub fn run_reserve(ctx: &Context, national_id: NationalId, place: &str, date: &str) -> anyhow::Result<()> {
    let reservation = ctx.store.make_reservation(national_id, place, date)?;

    if ctx.mode.is_human() {
        ui::success(&format!(
            "Reserved {} for {} on {}",
            reservation.place, reservation.national_id, reservation.date
        ));
    } else {
        emit_success(ctx.mode, "reserve", &reservation)?;
    }
    Ok(())
}

pub fn run_update_person(
    ctx: &Context,
    national_id: NationalId,
    first_name: Option<String>,
    last_name: Option<String>,
    picture: Option<PathBuf>,
) -> anyhow::Result<()> {
    let update = PersonUpdate {
        first_name,
        last_name,
        picture: picture.as_deref().map(read_picture).transpose()?,
    };
    let outcome = ctx.store.update_person(national_id, &update)?;
    report_outcome(ctx, "update-person", outcome, &format!("Person with national ID {} has been updated", national_id))
}

pub fn run_update_place(ctx: &Context, name: &str, phone: Option<String>, fee: Option<f64>) -> anyhow::Result<()> {
    let update = PlaceUpdate {
        phone_number: phone,
        reservation_fee: fee,
    };
    let outcome = ctx.store.update_place(name, &update)?;
    report_outcome(ctx, "update-place", outcome, &format!("Recreational place named {} has been updated", name))
}

pub fn run_update_reservation(
    ctx: &Context,
    national_id: NationalId,
    place: &str,
    old_date: &str,
    new_date: &str,
) -> anyhow::Result<()> {
    let outcome = ctx.store.update_reservation(national_id, place, old_date, new_date)?;
    report_outcome(ctx, "update-reservation", outcome, &format!("Reservation updated to new date {}", new_date))
}

pub fn run_history(ctx: &Context, national_id: NationalId, export_picture: bool) -> anyhow::Result<()> {
    let report = ctx.store.person_reservations(national_id)?;

    if !ctx.mode.is_human() {
        let picture_status = report.person.picture.as_deref().map(picture::summarize);
        if let Some(PictureStatus::Unreadable { error }) = &picture_status {
            tracing::warn!("Could not decode picture of {}: {}", national_id, error);
        }
        let data = serde_json::json!({
            "person": report.person,
            "picture": picture_status,
            "visits": report.visits,
        });
        return emit_success(ctx.mode, "history", data);
    }

    ui::header(Icons::PERSON, &format!("Name: {}", report.person.full_name()));

    if let Some(bytes) = &report.person.picture {
        let shown = if export_picture {
            ExportViewer::new(&ctx.picture_dir).show(&report.person, bytes)
        } else {
            SummaryViewer.show(&report.person, bytes)
        };
        // A broken picture never hides the reservations
        if let Err(e) = shown {
            tracing::warn!("Could not display picture of {}: {}", national_id, e);
            ui::warn(&format!("Could not display picture: {}", e));
        }
    }

    if report.visits.is_empty() {
        println!("{}", ui::muted("No reservations found."));
    } else {
        ui::section("Reservations");
        println!("{}", ui::visits_table(&report.visits));
    }
    Ok(())
}

pub fn run_range(ctx: &Context, national_id: NationalId, start: &str, end: &str) -> anyhow::Result<()> {
    let (person, visits) = ctx.store.person_reservations_in_range(national_id, start, end)?;

    if !ctx.mode.is_human() {
        let data = serde_json::json!({
            "person": person,
            "start": start,
            "end": end,
            "reservations": visits,
        });
        return emit_success(ctx.mode, "range", data);
    }

    ui::header(Icons::PERSON, &format!("Name: {}", person.full_name()));
    if visits.is_empty() {
        println!("{}", ui::muted(&format!("No reservations found between {} and {}.", start, end)));
    } else {
        ui::section(&format!("Reservations between {} and {}", start, end));
        println!("{}", ui::range_table(&visits));
    }
    Ok(())
}

pub fn run_fees(ctx: &Context, place: &str) -> anyhow::Result<()> {
    let rows = ctx.store.place_fees(place)?;

    if !ctx.mode.is_human() {
        return emit_success(ctx.mode, "fees", &rows);
    }

    if rows.is_empty() {
        println!("{}", ui::muted(&format!("No reservations found for place '{}'.", place)));
        return Ok(());
    }

    ui::header(Icons::MONEY, &format!("Reservations and fees for {}", place));
    println!("{}", ui::fee_table(&rows));
    let total: f64 = rows.iter().map(|r| r.total_fee).sum();
    ui::summary_row("Total collected:", &ui::money(total).style(theme().money.clone()).to_string());
    Ok(())
}

pub fn run_stats(ctx: &Context, database: &Path) -> anyhow::Result<()> {
    let stats = ctx.store.stats()?;

    if !ctx.mode.is_human() {
        return emit_success(ctx.mode, "stats", &stats);
    }

    ui::header(Icons::STATS, &format!("Reservations Statistics ({})", database.display()));
    let mut table = TableBuilder::new();
    table.add_row("People", &stats.people.to_string());
    table.add_row("Places", &stats.places.to_string());
    table.add_row("Reservations", &stats.reservations.to_string());
    println!("{}", table.build());
    Ok(())
}

fn report_outcome(ctx: &Context, command: &str, outcome: UpdateOutcome, updated: &str) -> anyhow::Result<()> {
    if !ctx.mode.is_human() {
        return emit_success(ctx.mode, command, serde_json::json!({ "outcome": outcome }));
    }
    match outcome {
        UpdateOutcome::Updated => ui::success(updated),
        UpdateOutcome::NothingToUpdate => println!("{} {}", Icons::WRENCH, ui::dim("Nothing to update.")),
    }
    Ok(())
}

fn read_picture(path: &Path) -> anyhow::Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    if let Err(e) = picture::inspect(&bytes) {
        ui::warn(&format!("{} does not look like an image: {}", path.display(), e));
    }
    Ok(bytes)
}
