/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Ragas (melodic frameworks)
CREATE TABLE IF NOT EXISTS ragas (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    name TEXT NOT NULL,
    thaat TEXT NOT NULL DEFAULT '',
    time TEXT NOT NULL DEFAULT '',
    vadi TEXT NOT NULL DEFAULT '',
    samvadi TEXT NOT NULL DEFAULT '',
    aroha TEXT NOT NULL DEFAULT '',
    avroha TEXT NOT NULL DEFAULT '',
    pakad TEXT NOT NULL DEFAULT '',
    description TEXT
);

CREATE INDEX IF NOT EXISTS idx_ragas_name ON ragas(name);

-- Bandishes (compositions); a bandish may exist without a raga
CREATE TABLE IF NOT EXISTS bandishes (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    raga_id TEXT REFERENCES ragas(id) ON DELETE SET NULL,
    title TEXT NOT NULL,
    type TEXT NOT NULL DEFAULT 'khayal',
    tempo TEXT NOT NULL DEFAULT 'madhya',
    tala TEXT NOT NULL DEFAULT '',
    composer TEXT,
    lyrics TEXT NOT NULL DEFAULT '',
    audio_ref TEXT,
    notation_ref TEXT
);

CREATE INDEX IF NOT EXISTS idx_bandishes_raga_id ON bandishes(raga_id);
CREATE INDEX IF NOT EXISTS idx_bandishes_title ON bandishes(title);

-- Diary entries
CREATE TABLE IF NOT EXISTS diary_entries (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    image_ref TEXT
);
"#;

const MIGRATION_002: &str = r#"
-- Karyakrams (performance events)
CREATE TABLE IF NOT EXISTS karyakrams (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    title TEXT NOT NULL,
    date TEXT,
    venue TEXT,
    notes TEXT,
    status TEXT NOT NULL DEFAULT 'planned'
        CHECK (status IN ('planned', 'completed', 'draft'))
);

CREATE INDEX IF NOT EXISTS idx_karyakrams_date ON karyakrams(date);

-- Setlist rows. bandish_id is deliberately not a foreign key: deleting a
-- bandish leaves the row in place and readers render it as missing.
CREATE TABLE IF NOT EXISTS karyakram_items (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    karyakram_id TEXT NOT NULL REFERENCES karyakrams(id) ON DELETE CASCADE,
    bandish_id TEXT NOT NULL,
    sequence_order INTEGER NOT NULL,
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_karyakram_items_karyakram_id
    ON karyakram_items(karyakram_id, sequence_order);
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "repertoire",
        sql: MIGRATION_001,
    },
    Migration {
        version: 2,
        name: "karyakrams",
        sql: MIGRATION_002,
    },
];
