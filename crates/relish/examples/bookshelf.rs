//! Binds two repositories to one connection and hydrates a relation.
//!
//! Expects a reachable PostgreSQL instance:
//! `postgresql://postgres@localhost:5432/bookshelf` with `authors` and
//! `books` tables.

use relish::{
    connect, Assignment, Entity, Filter, Group, HasMany, Options, Payload, Repository, Slot,
    Value,
};

use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
struct Author {
    id: uuid::Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    books: Vec<Book>,
}

impl Entity for Author {
    fn slots(&mut self) -> Vec<(&'static str, Slot<'_>)> {
        vec![
            ("id", Slot::Uuid(&mut self.id)),
            ("name", Slot::Text(&mut self.name)),
            ("created_at", Slot::Timestamp(&mut self.created_at)),
            ("updated_at", Slot::Timestamp(&mut self.updated_at)),
            ("deleted_at", Slot::OptTimestamp(&mut self.deleted_at)),
        ]
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::Uuid(self.id)),
            "name" => Some(Value::from(self.name.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct Book {
    id: uuid::Uuid,
    author_id: uuid::Uuid,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Entity for Book {
    fn slots(&mut self) -> Vec<(&'static str, Slot<'_>)> {
        vec![
            ("id", Slot::Uuid(&mut self.id)),
            ("author_id", Slot::Uuid(&mut self.author_id)),
            ("title", Slot::Text(&mut self.title)),
            ("created_at", Slot::Timestamp(&mut self.created_at)),
            ("updated_at", Slot::Timestamp(&mut self.updated_at)),
        ]
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::Uuid(self.id)),
            "author_id" => Some(Value::Uuid(self.author_id)),
            "title" => Some(Value::from(self.title.clone())),
            _ => None,
        }
    }
}

fn push_book(author: &mut Author, book: Book) {
    author.books.push(book);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> relish::Result<()> {
    let client = connect("postgresql://postgres@localhost:5432/bookshelf").await?;

    let books: Repository<Book> = Repository::builder("books")
        .order_columns(["title", "created_at"])
        .build(client.clone());

    let authors: Repository<Author> = Repository::builder("authors")
        .order_columns(["name", "created_at"])
        .soft_delete("deleted_at")
        .relation(
            "books",
            Arc::new(HasMany {
                repository: books.clone(),
                parent_field: "id",
                child_fk_column: "author_id",
                child_fk_field: "author_id",
                append: push_book,
            }),
        )?
        .build(client);

    let mut payload = Payload::new();
    payload.insert("name".to_string(), Assignment::value("Ursula K. Le Guin"));
    let created = authors.create(payload, Options::default()).await?;
    println!("created author {}", created.id);

    let shelved = authors
        .get(
            Group::and([Filter::like("name", "Ursula%")]),
            Options {
                relations: vec!["books".to_string()],
                limit: 10,
                ..Options::default()
            },
        )
        .await?;

    for author in &shelved {
        println!("{}: {} book(s)", author.name, author.books.len());
    }

    Ok(())
}
