// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! `cargo xtask <command>` for the Step Count workspace:
//!
//! - `ci`: lint, build and test, in that order
//! - `build`, `check`, `lint`, `test`: the everyday cargo invocations
//! - `test-postgres`: runs the ignored backend validation tests of
//!   `stepcount-persistence` against a real `PostgreSQL`
//! - `verify-migrations`: applies `migrations/` to `SQLite` and
//!   `migrations_postgres/` to `PostgreSQL` and fails if the resulting
//!   schemas differ
//!
//! The two `PostgreSQL` commands run a disposable `postgres:16`
//! container through Docker. A plain `cargo test` needs no database
//! server.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{bail, eyre, Context},
    Result,
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, PgConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const POSTGRES_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_postgres");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Lint, build and test
    CI,

    /// Build every target
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check on every target
    #[command(visible_alias = "c")]
    Check,

    /// Run clippy, rustfmt and rustdoc with warnings denied
    #[command(visible_alias = "l")]
    Lint,

    /// Run unit and doc tests (`SQLite` only)
    #[command(visible_alias = "t")]
    Test,

    /// Run the backend validation tests against `PostgreSQL`
    #[command(visible_alias = "tp")]
    TestPostgres,

    /// Check that both migration sets produce the same schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => {
                lint()?;
                cargo(&["build", "--all-targets", "--all-features"])?;
                test()
            }
            Self::Build => cargo(&["build", "--all-targets", "--all-features"]),
            Self::Check => cargo(&["check", "--all-targets", "--all-features"]),
            Self::Lint => lint(),
            Self::Test => test(),
            Self::TestPostgres => test_postgres(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

fn cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

fn lint() -> Result<()> {
    cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])?;

    // rustfmt and rustdoc run on nightly; CARGO is set by the outer cargo
    cmd!("cargo", "fmt", "--all", "--check")
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;

    let metadata = MetadataCommand::new()
        .exec()
        .wrap_err("failed to read cargo metadata")?;
    for package in metadata.workspace_default_packages() {
        cmd!(
            "cargo",
            "doc",
            "--no-deps",
            "--all-features",
            "--package",
            package.name.as_str()
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }
    Ok(())
}

fn test() -> Result<()> {
    cargo(&["test", "--all-targets", "--all-features"])?;
    cargo(&["test", "--doc", "--all-features"])
}

/// Starts a container on port 5433 and runs
/// `cargo test -p stepcount-persistence backend_validation_tests -- --ignored`
/// with `DATABASE_URL` and `STEPCOUNT_TEST_BACKEND=postgres` set.
///
/// The tests share one database and therefore run on a single thread.
fn test_postgres() -> Result<()> {
    let postgres = PostgresContainer::start("stepcount-test-postgres", 5433)?;

    cmd!(
        "cargo",
        "test",
        "--package",
        "stepcount-persistence",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", postgres.url())
    .env("STEPCOUNT_TEST_BACKEND", "postgres")
    .run_with_trace()
    .wrap_err("PostgreSQL backend validation tests failed")?;

    tracing::info!("PostgreSQL backend validation passed");
    Ok(())
}

/// A `postgres:16` container that is force-removed when dropped.
struct PostgresContainer {
    name: &'static str,
    port: u16,
}

impl PostgresContainer {
    const USER: &'static str = "stepcount";
    const PASSWORD: &'static str = "stepcount";
    const DATABASE: &'static str = "stepcount_test";
    const READY_ATTEMPTS: u32 = 30;

    fn start(name: &'static str, port: u16) -> Result<Self> {
        cmd!("docker", "--version")
            .stdout_null()
            .run()
            .wrap_err("Docker is required for PostgreSQL commands")?;

        // A container left behind by an interrupted run would hold the port
        let _ = cmd!("docker", "rm", "--force", name)
            .stdout_null()
            .stderr_null()
            .run();

        cmd!(
            "docker",
            "run",
            "--detach",
            "--name",
            name,
            "--env",
            format!("POSTGRES_USER={}", Self::USER),
            "--env",
            format!("POSTGRES_PASSWORD={}", Self::PASSWORD),
            "--env",
            format!("POSTGRES_DB={}", Self::DATABASE),
            "--publish",
            format!("{port}:5432"),
            "postgres:16"
        )
        .stdout_null()
        .run_with_trace()
        .wrap_err("failed to start the PostgreSQL container")?;

        let container = Self { name, port };
        container.wait_until_ready()?;
        Ok(container)
    }

    fn wait_until_ready(&self) -> Result<()> {
        for attempt in 1..=Self::READY_ATTEMPTS {
            std::thread::sleep(std::time::Duration::from_secs(1));
            if PgConnection::establish(&self.url()).is_ok() {
                tracing::info!(attempt, "PostgreSQL is accepting connections");
                return Ok(());
            }
            tracing::debug!(attempt, "PostgreSQL not ready yet");
        }
        bail!(
            "PostgreSQL did not accept connections within {} seconds",
            Self::READY_ATTEMPTS
        )
    }

    fn url(&self) -> String {
        format!(
            "postgres://{}:{}@127.0.0.1:{}/{}",
            Self::USER,
            Self::PASSWORD,
            self.port,
            Self::DATABASE
        )
    }
}

impl Drop for PostgresContainer {
    fn drop(&mut self) {
        tracing::info!("removing container {}", self.name);
        let _ = cmd!("docker", "rm", "--force", self.name)
            .stdout_null()
            .run();
    }
}

/// Applies both migration sets and compares the schemas they leave
/// behind: columns with their type family and nullability, primary keys,
/// foreign keys with their `ON DELETE` action, unique column sets and
/// plain indexes. Index names are not compared.
fn verify_migrations() -> Result<()> {
    let mut sqlite = SqliteConnection::establish(":memory:")
        .wrap_err("failed to open an in-memory SQLite database")?;
    sqlite
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("SQLite migrations failed: {e}"))?;

    let postgres_container = PostgresContainer::start("stepcount-verify-migrations", 5434)?;
    let mut postgres = PgConnection::establish(&postgres_container.url())
        .wrap_err("failed to connect to PostgreSQL")?;
    postgres
        .run_pending_migrations(POSTGRES_MIGRATIONS)
        .map_err(|e| eyre!("PostgreSQL migrations failed: {e}"))?;

    let sqlite_schema: Schema = Schema::from_rows(
        diesel::sql_query(SQLITE_COLUMNS).load(&mut sqlite)?,
        diesel::sql_query(SQLITE_FOREIGN_KEYS).load(&mut sqlite)?,
        diesel::sql_query(SQLITE_INDEXES).load(&mut sqlite)?,
    );
    let postgres_schema: Schema = Schema::from_rows(
        diesel::sql_query(POSTGRES_COLUMNS).load(&mut postgres)?,
        diesel::sql_query(POSTGRES_FOREIGN_KEYS).load(&mut postgres)?,
        diesel::sql_query(POSTGRES_INDEXES).load(&mut postgres)?,
    );

    let differences: Vec<String> = schema_differences(&sqlite_schema, &postgres_schema);
    if !differences.is_empty() {
        bail!(
            "SQLite and PostgreSQL schemas differ:\n{}",
            differences.join("\n")
        );
    }

    tracing::info!(
        tables = sqlite_schema.table_count(),
        "SQLite and PostgreSQL schemas match"
    );
    Ok(())
}

// Each engine reports the same three row shapes. `required` folds
// primary keys in, since SQLite reports an INTEGER PRIMARY KEY as
// nullable while PostgreSQL does not.

const SQLITE_COLUMNS: &str = "\
    SELECT m.name AS table_name, c.name AS column_name, c.\"type\" AS data_type, \
           (c.\"notnull\" = 1 OR c.pk > 0) AS required, (c.pk > 0) AS primary_key \
    FROM sqlite_master m JOIN pragma_table_info(m.name) c \
    WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite_%' \
      AND m.name <> '__diesel_schema_migrations'";

const SQLITE_FOREIGN_KEYS: &str = "\
    SELECT m.name AS table_name, f.\"from\" AS column_name, \
           f.\"table\" AS referenced_table, f.\"to\" AS referenced_column, \
           upper(f.on_delete) AS on_delete \
    FROM sqlite_master m JOIN pragma_foreign_key_list(m.name) f \
    WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite_%' \
      AND m.name <> '__diesel_schema_migrations'";

const SQLITE_INDEXES: &str = "\
    SELECT m.name AS table_name, l.name AS index_name, l.\"unique\" AS is_unique, \
           i.name AS column_name \
    FROM sqlite_master m JOIN pragma_index_list(m.name) l \
         JOIN pragma_index_info(l.name) i \
    WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite_%' \
      AND m.name <> '__diesel_schema_migrations' AND l.origin <> 'pk' \
    ORDER BY m.name, l.name, i.seqno";

const POSTGRES_COLUMNS: &str = "\
    SELECT c.table_name::text AS table_name, c.column_name::text AS column_name, \
           c.data_type::text AS data_type, (c.is_nullable = 'NO')::int AS required, \
           (EXISTS ( \
               SELECT 1 FROM pg_index ix \
               JOIN pg_attribute a ON a.attrelid = ix.indrelid AND a.attnum = ANY(ix.indkey::int2[]) \
               WHERE ix.indisprimary \
                 AND ix.indrelid = (quote_ident(c.table_schema) || '.' || quote_ident(c.table_name))::regclass \
                 AND a.attname = c.column_name \
           ))::int AS primary_key \
    FROM information_schema.columns c \
    WHERE c.table_schema = 'public' AND c.table_name <> '__diesel_schema_migrations'";

const POSTGRES_FOREIGN_KEYS: &str = "\
    SELECT t.relname::text AS table_name, a.attname::text AS column_name, \
           r.relname::text AS referenced_table, ra.attname::text AS referenced_column, \
           CASE con.confdeltype \
               WHEN 'c' THEN 'CASCADE' WHEN 'n' THEN 'SET NULL' \
               WHEN 'd' THEN 'SET DEFAULT' WHEN 'r' THEN 'RESTRICT' \
               ELSE 'NO ACTION' END AS on_delete \
    FROM pg_constraint con \
    JOIN pg_class t ON t.oid = con.conrelid \
    JOIN pg_namespace n ON n.oid = t.relnamespace \
    JOIN pg_class r ON r.oid = con.confrelid \
    JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = con.conkey[1] \
    JOIN pg_attribute ra ON ra.attrelid = con.confrelid AND ra.attnum = con.confkey[1] \
    WHERE con.contype = 'f' AND n.nspname = 'public'";

const POSTGRES_INDEXES: &str = "\
    SELECT t.relname::text AS table_name, i.relname::text AS index_name, \
           ix.indisunique::int AS is_unique, a.attname::text AS column_name \
    FROM pg_index ix \
    JOIN pg_class t ON t.oid = ix.indrelid \
    JOIN pg_class i ON i.oid = ix.indexrelid \
    JOIN pg_namespace n ON n.oid = t.relnamespace \
    JOIN LATERAL unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, position) ON true \
    JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum \
    WHERE n.nspname = 'public' AND NOT ix.indisprimary \
      AND t.relname <> '__diesel_schema_migrations' \
    ORDER BY t.relname, i.relname, k.position";

#[derive(QueryableByName)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    data_type: String,
    #[diesel(sql_type = Integer)]
    required: i32,
    #[diesel(sql_type = Integer)]
    primary_key: i32,
}

#[derive(QueryableByName)]
struct ForeignKeyRow {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    referenced_table: String,
    #[diesel(sql_type = Text)]
    referenced_column: String,
    #[diesel(sql_type = Text)]
    on_delete: String,
}

#[derive(QueryableByName)]
struct IndexRow {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    index_name: String,
    #[diesel(sql_type = Integer)]
    is_unique: i32,
    #[diesel(sql_type = Text)]
    column_name: String,
}

/// Engine-neutral description of one table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct TableShape {
    /// Column name to (type family, required).
    columns: BTreeMap<String, (&'static str, bool)>,
    primary_key: BTreeSet<String>,
    /// (column, referenced table, referenced column, on delete).
    foreign_keys: BTreeSet<(String, String, String, String)>,
    unique_sets: BTreeSet<Vec<String>>,
    indexes: BTreeSet<Vec<String>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Schema(BTreeMap<String, TableShape>);

impl Schema {
    fn from_rows(
        columns: Vec<ColumnRow>,
        foreign_keys: Vec<ForeignKeyRow>,
        indexes: Vec<IndexRow>,
    ) -> Self {
        let mut tables: BTreeMap<String, TableShape> = BTreeMap::new();

        for row in columns {
            let table: &mut TableShape = tables.entry(row.table_name).or_default();
            if row.primary_key != 0 {
                table.primary_key.insert(row.column_name.clone());
            }
            table.columns.insert(
                row.column_name,
                (type_family(&row.data_type), row.required != 0),
            );
        }

        for row in foreign_keys {
            tables.entry(row.table_name).or_default().foreign_keys.insert((
                row.column_name,
                row.referenced_table,
                row.referenced_column,
                row.on_delete,
            ));
        }

        // Rows arrive ordered by table, index, then column position
        let mut grouped: BTreeMap<(String, String), (bool, Vec<String>)> = BTreeMap::new();
        for row in indexes {
            grouped
                .entry((row.table_name, row.index_name))
                .or_insert_with(|| (row.is_unique != 0, Vec::new()))
                .1
                .push(row.column_name);
        }
        for ((table_name, _), (unique, columns)) in grouped {
            let table: &mut TableShape = tables.entry(table_name).or_default();
            if unique {
                table.unique_sets.insert(columns);
            } else {
                table.indexes.insert(columns);
            }
        }

        Self(tables)
    }

    fn table_count(&self) -> usize {
        self.0.len()
    }
}

/// Maps an engine type name onto the family both engines agree on.
fn type_family(engine_type: &str) -> &'static str {
    let lower: String = engine_type.to_lowercase();
    if lower.contains("int") {
        "integer"
    } else if ["real", "floa", "doub", "numeric"]
        .iter()
        .any(|marker| lower.contains(marker))
    {
        "real"
    } else if lower.contains("blob") || lower == "bytea" {
        "blob"
    } else {
        "text"
    }
}

/// Lists every difference between the two schemas, one line each.
fn schema_differences(sqlite: &Schema, postgres: &Schema) -> Vec<String> {
    fn facet<T: Debug + PartialEq>(
        out: &mut Vec<String>,
        table: &str,
        name: &str,
        sqlite: &T,
        postgres: &T,
    ) {
        if sqlite != postgres {
            out.push(format!(
                "  {table}: {name} differ\n    SQLite:     {sqlite:?}\n    PostgreSQL: {postgres:?}"
            ));
        }
    }

    let mut out: Vec<String> = Vec::new();

    for name in sqlite.0.keys().filter(|name| !postgres.0.contains_key(*name)) {
        out.push(format!("  {name}: only in SQLite"));
    }
    for name in postgres.0.keys().filter(|name| !sqlite.0.contains_key(*name)) {
        out.push(format!("  {name}: only in PostgreSQL"));
    }

    for (name, left) in &sqlite.0 {
        let Some(right) = postgres.0.get(name) else {
            continue;
        };
        facet(&mut out, name, "columns", &left.columns, &right.columns);
        facet(&mut out, name, "primary keys", &left.primary_key, &right.primary_key);
        facet(&mut out, name, "foreign keys", &left.foreign_keys, &right.foreign_keys);
        facet(&mut out, name, "unique constraints", &left.unique_sets, &right.unique_sets);
        facet(&mut out, name, "indexes", &left.indexes, &right.indexes);
    }

    out
}

/// Logs a `duct` expression before running it, and again if it fails.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run()
            .inspect_err(|_| tracing::error!("failed to run command: {:?}", self))
    }
}
