//! SQL schema for the Agora SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY,
    username   TEXT NOT NULL UNIQUE,
    email      TEXT NOT NULL UNIQUE,
    xp         INTEGER NOT NULL DEFAULT 0,
    wins       INTEGER NOT NULL DEFAULT 0,
    level      TEXT NOT NULL DEFAULT 'novice',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    category_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    slug        TEXT NOT NULL
);

-- status is written only by the lifecycle machine (recompute/cancel).
CREATE TABLE IF NOT EXISTS debates (
    debate_id   TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    category_id TEXT REFERENCES categories(category_id),
    author_id   TEXT NOT NULL REFERENCES users(user_id),
    created_at  TEXT NOT NULL,
    start_time  TEXT NOT NULL,
    end_time    TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'scheduled',
    CHECK (end_time > start_time)
);

CREATE TABLE IF NOT EXISTS debate_participants (
    debate_id TEXT NOT NULL REFERENCES debates(debate_id) ON DELETE CASCADE,
    user_id   TEXT NOT NULL REFERENCES users(user_id),
    joined_at TEXT NOT NULL,
    PRIMARY KEY (debate_id, user_id)
);

-- vote_count caches COUNT(votes); both change in the same transaction.
CREATE TABLE IF NOT EXISTS arguments (
    argument_id TEXT PRIMARY KEY,
    debate_id   TEXT NOT NULL REFERENCES debates(debate_id) ON DELETE CASCADE,
    author_id   TEXT NOT NULL REFERENCES users(user_id),
    text        TEXT NOT NULL,
    side        TEXT NOT NULL,             -- 'pro' | 'con'
    vote_count  INTEGER NOT NULL DEFAULT 0,
    winner      INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS votes (
    vote_id     TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    argument_id TEXT NOT NULL REFERENCES arguments(argument_id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    UNIQUE (user_id, argument_id)
);

CREATE INDEX IF NOT EXISTS debates_status_idx    ON debates(status);
CREATE INDEX IF NOT EXISTS debates_category_idx  ON debates(category_id);
CREATE INDEX IF NOT EXISTS arguments_debate_idx  ON arguments(debate_id);
CREATE INDEX IF NOT EXISTS votes_argument_idx    ON votes(argument_id);

PRAGMA user_version = 1;
";
