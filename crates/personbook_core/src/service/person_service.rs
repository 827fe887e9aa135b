//! Person use-case service.
//!
//! # Responsibility
//! - Expose the fixed set of person use-cases as single calls.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Every failure is logged once and returned unchanged; nothing is retried.
//! - Service layer remains storage-agnostic.
//! - `find_edit_then_save` is a plain read then write. A concurrent write
//!   between the two is overwritten.

use crate::model::person::{DeleteSummary, NewPerson, Person, PersonId, PersonSummary};
use crate::repo::person_repo::{
    PersonQuery, PersonRepository, RepoError, RepoResult, SortField, SortOrder,
};
use log::{debug, error};

pub const SAMPLE_PERSON_NAME: &str = "John Doe";
pub const SAMPLE_PERSON_AGE: i64 = 25;
pub const SAMPLE_PERSON_FOODS: [&str; 2] = ["pizza", "pasta"];
/// Food appended by `find_edit_then_save`.
pub const FOOD_TO_ADD: &str = "hamburger";
/// Age written by `find_and_update`.
pub const AGE_TO_SET: i64 = 20;
pub const QUERY_CHAIN_FOOD: &str = "burrito";
pub const QUERY_CHAIN_LIMIT: u32 = 2;

/// Use-case service wrapper for person documents.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists the fixed sample person.
    pub fn create_and_save_person(&self) -> RepoResult<Person> {
        let sample = NewPerson::new(SAMPLE_PERSON_NAME)
            .with_age(SAMPLE_PERSON_AGE)
            .with_foods(SAMPLE_PERSON_FOODS);
        observe("create_and_save_person", self.repo.insert_person(&sample))
    }

    /// Persists every input; returns documents in input order.
    ///
    /// Nothing is persisted when any input fails validation or storage.
    pub fn create_many_people(&self, people: &[NewPerson]) -> RepoResult<Vec<Person>> {
        observe("create_many_people", self.repo.insert_people(people))
    }

    pub fn find_people_by_name(&self, name: &str) -> RepoResult<Vec<Person>> {
        let query = PersonQuery::new().name(name);
        observe("find_people_by_name", self.repo.find_people(&query))
    }

    /// Returns the earliest-inserted person whose favorites include `food`.
    pub fn find_one_by_food(&self, food: &str) -> RepoResult<Option<Person>> {
        let query = PersonQuery::new().favorite_food(food).limit(1);
        let found = self
            .repo
            .find_people(&query)
            .map(|people| people.into_iter().next());
        observe("find_one_by_food", found)
    }

    pub fn find_person_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        observe("find_person_by_id", self.repo.get_person(id))
    }

    /// Loads a person, appends [`FOOD_TO_ADD`] and saves the whole document.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no person has `id`, either before the
    ///   read or because it was removed before the save.
    pub fn find_edit_then_save(&self, id: PersonId) -> RepoResult<Person> {
        let result = self.repo.get_person(id).and_then(|found| {
            let mut person = found.ok_or(RepoError::NotFound(id))?;
            person.add_favorite_food(FOOD_TO_ADD);
            self.repo.save_person(&person)?;
            Ok(person)
        });
        observe("find_edit_then_save", result)
    }

    /// Sets `age` to [`AGE_TO_SET`] on the first person named `name`.
    ///
    /// Returns the document as it is after the update.
    pub fn find_and_update(&self, name: &str) -> RepoResult<Option<Person>> {
        observe(
            "find_and_update",
            self.repo.update_age_by_name(name, AGE_TO_SET),
        )
    }

    pub fn remove_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        observe("remove_by_id", self.repo.delete_person(id))
    }

    pub fn remove_many_people(&self, name: &str) -> RepoResult<DeleteSummary> {
        observe(
            "remove_many_people",
            self.repo.delete_people_by_name(name),
        )
    }

    /// People who like [`QUERY_CHAIN_FOOD`], by name ascending, at most
    /// [`QUERY_CHAIN_LIMIT`], without `age`.
    pub fn query_chain(&self) -> RepoResult<Vec<PersonSummary>> {
        let query = PersonQuery::new()
            .favorite_food(QUERY_CHAIN_FOOD)
            .sort_by(SortField::Name, SortOrder::Ascending)
            .limit(QUERY_CHAIN_LIMIT);
        observe("query_chain", self.repo.find_summaries(&query))
    }

    /// Runs an arbitrary chained query.
    pub fn query(&self, query: &PersonQuery) -> RepoResult<Vec<Person>> {
        observe("query", self.repo.find_people(query))
    }
}

fn observe<T>(event: &'static str, result: RepoResult<T>) -> RepoResult<T> {
    match &result {
        Ok(_) => debug!("event={event} module=person_service status=ok"),
        Err(err) => error!("event={event} module=person_service status=error error={err}"),
    }
    result
}
