pub const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notebooks (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        password TEXT,
        image BLOB,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id TEXT PRIMARY KEY,
        notebook_id TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        color TEXT,
        happiness INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY(notebook_id) REFERENCES notebooks(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_notebooks_created_at ON notebooks(created_at)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_notes_notebook ON notes(notebook_id, created_at)
    "#,
];
