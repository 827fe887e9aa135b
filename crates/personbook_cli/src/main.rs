//! Walkthrough binary for the person store.
//!
//! # Responsibility
//! - Open the store named by `PERSONBOOK_DB_URI`.
//! - Run every person use-case once and print each result as one JSON line.

use log::error;
use personbook_core::db::close_db;
use personbook_core::{
    init_from_config, NewPerson, PersonService, SqlitePersonRepository, StoreConfig,
};
use serde::Serialize;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("could not load configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_from_config(&config) {
        eprintln!("could not start logging: {err}");
    }

    let conn = match config.open() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("could not connect to the person store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = SqlitePersonRepository::try_new(&conn)
        .map_err(Box::<dyn Error>::from)
        .and_then(|repo| run(&PersonService::new(repo)));
    let closed = close_db(conn);
    personbook_core::flush_logging();

    match (outcome, closed) {
        (Ok(()), Ok(())) => ExitCode::SUCCESS,
        (Err(err), _) => {
            error!("event=walkthrough module=cli status=error error={err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
        (Ok(()), Err(err)) => {
            eprintln!("could not close the person store: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(service: &PersonService<SqlitePersonRepository<'_>>) -> Result<(), Box<dyn Error>> {
    println!("personbook_core version={}", personbook_core::core_version());

    let sample = service.create_and_save_person()?;
    emit("create_and_save_person", &sample)?;

    let crew = service.create_many_people(&[
        NewPerson::new("Mary").with_age(16).with_foods(["burrito", "salad"]),
        NewPerson::new("Pablo").with_age(26).with_foods(["burrito", "hot-dog"]),
        NewPerson::new("Ashley").with_age(32).with_foods(["steak", "burrito"]),
        NewPerson::new("Mary").with_age(21).with_foods(["sushi"]),
    ])?;
    emit("create_many_people", &crew)?;

    emit("find_people_by_name", &service.find_people_by_name("Mary")?)?;
    emit("find_one_by_food", &service.find_one_by_food("sushi")?)?;
    emit("find_person_by_id", &service.find_person_by_id(sample.id())?)?;
    emit("find_edit_then_save", &service.find_edit_then_save(sample.id())?)?;
    emit("find_and_update", &service.find_and_update("Pablo")?)?;
    emit("query_chain", &service.query_chain()?)?;
    emit("remove_by_id", &service.remove_by_id(sample.id())?)?;
    emit("remove_many_people", &service.remove_many_people("Mary")?)?;

    Ok(())
}

fn emit<T: Serialize>(operation: &str, value: &T) -> Result<(), serde_json::Error> {
    println!("{operation} {}", serde_json::to_string(value)?);
    Ok(())
}
