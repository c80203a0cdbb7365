//! Generic CRUD commands shared by every resource.
//!
//! Each entity module turns its clap arguments into DTOs and calls into the
//! functions here, which drive the core screens and print the result.

pub mod places;
pub mod units;
pub mod users;

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use fleet_core::{
    ApiError, EntityId, EntityService, FormScreen, ListScreen, LoadOutcome, Resource,
    SubmitError, Transport,
};
use tracing::debug;

use crate::render::{self, OutputFormat, Render};

pub async fn list<R, T>(service: &EntityService<R, T>, format: OutputFormat) -> Result<()>
where
    R: Resource,
    R::Record: Render,
    T: Transport,
{
    let mut screen = ListScreen::<R>::new();
    let ticket = screen.enter();
    let outcome = screen.finish_load(ticket, service.list().await);
    if outcome == LoadOutcome::Failed {
        if let Some(err) = screen.error() {
            return Err(failure(err, &format!("Could not load {}", R::PATH)));
        }
    }

    match format {
        OutputFormat::Json => println!("{}", render::json(screen.items())?),
        OutputFormat::Table if screen.items().is_empty() => println!("No {} found.", R::PATH),
        OutputFormat::Table => println!("{}", render::table(screen.items())),
    }
    screen.leave();
    Ok(())
}

pub async fn get<R, T>(service: &EntityService<R, T>, id: EntityId, format: OutputFormat) -> Result<()>
where
    R: Resource,
    R::Record: Render,
    T: Transport,
{
    let record = service
        .get(id)
        .await
        .map_err(|err| failure(&err, &format!("Could not load {} {id}", R::NAME)))?;
    show(&record, format)
}

pub async fn create<R, T>(
    service: &EntityService<R, T>,
    input: &R::Create,
    format: OutputFormat,
) -> Result<()>
where
    R: Resource,
    R::Record: Render,
    T: Transport,
{
    let mut form = FormScreen::new();
    match form.submit_create(service, input).await {
        Ok(record) => {
            eprintln!("Created {} {}.", R::NAME, record.id());
            show(&record, format)
        }
        Err(err) => Err(rejected(&form, err, &format!("Could not create {}", R::NAME))),
    }
}

pub async fn update<R, T>(
    service: &EntityService<R, T>,
    id: EntityId,
    input: &R::Update,
    format: OutputFormat,
) -> Result<()>
where
    R: Resource,
    R::Record: Render,
    T: Transport,
{
    let mut form = FormScreen::new();
    match form.submit_update(service, id, input).await {
        Ok(record) => {
            eprintln!("Updated {} {id}.", R::NAME);
            show(&record, format)
        }
        Err(err) => Err(rejected(&form, err, &format!("Could not update {} {id}", R::NAME))),
    }
}

pub async fn delete<R, T>(service: &EntityService<R, T>, id: EntityId, yes: bool) -> Result<()>
where
    R: Resource,
    T: Transport,
{
    if !yes {
        let prompt = format!("Delete {} {id}?", R::NAME);
        if !confirm(&prompt, &mut io::stdin().lock(), &mut io::stderr())? {
            eprintln!("Cancelled.");
            return Ok(());
        }
    }
    service
        .delete(id)
        .await
        .map_err(|err| failure(&err, &format!("Could not delete {} {id}", R::NAME)))?;
    eprintln!("Deleted {} {id}.", R::NAME);
    Ok(())
}

/// Refuse an update that would send an empty body.
pub fn ensure_changes(is_empty: bool) -> Result<()> {
    if is_empty {
        return Err(anyhow!("Nothing to update: pass at least one field."));
    }
    Ok(())
}

/// Ask a yes/no question. Anything but `y`/`yes` counts as no.
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{prompt} [y/N]: ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn show<T: Render>(record: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render::json(record)?),
        OutputFormat::Table => println!("{}", render::detail(record)),
    }
    Ok(())
}

fn failure(err: &ApiError, fallback: &str) -> anyhow::Error {
    debug!(error = %err, "request failed");
    anyhow!(err.user_message(fallback))
}

fn rejected(form: &FormScreen, err: SubmitError, fallback: &str) -> anyhow::Error {
    match err {
        SubmitError::Invalid(_) => anyhow!(field_report(form)),
        SubmitError::Api(err) => failure(&err, fallback),
    }
}

fn field_report(form: &FormScreen) -> String {
    let mut report = String::from("Invalid input:");
    for (field, message) in form.field_errors() {
        report.push_str(&format!("\n  {field}: {message}"));
    }
    report
}
