use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Draw, Game, Grid};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS loto_draws (
    draw_id       TEXT PRIMARY KEY,
    date          TEXT NOT NULL,
    ball_1        INTEGER NOT NULL,
    ball_2        INTEGER NOT NULL,
    ball_3        INTEGER NOT NULL,
    ball_4        INTEGER NOT NULL,
    ball_5        INTEGER NOT NULL,
    chance        INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS joker_draws (
    draw_id       TEXT PRIMARY KEY,
    date          TEXT NOT NULL,
    digits        TEXT NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lechance.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, game: Game, draw: &Draw) -> Result<bool> {
    let changed = match (&draw.grid, game) {
        (Grid::Balls { balls, bonus }, Game::Loto) => conn
            .execute(
                "INSERT OR IGNORE INTO loto_draws (draw_id, date, ball_1, ball_2, ball_3, ball_4, ball_5, chance)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    draw.draw_id,
                    draw.date,
                    balls[0],
                    balls[1],
                    balls[2],
                    balls[3],
                    balls[4],
                    bonus,
                ],
            )
            .context("Échec de l'insertion")?,
        (Grid::Digits(digits), Game::Joker) => {
            let digits_str: String = digits.iter().map(|d| d.to_string()).collect();
            conn.execute(
                "INSERT OR IGNORE INTO joker_draws (draw_id, date, digits)
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![draw.draw_id, draw.date, digits_str],
            )
            .context("Échec de l'insertion")?
        }
        _ => anyhow::bail!("Grille incompatible avec le jeu {}", game),
    };
    Ok(changed > 0)
}

/// Tirages les plus récents en premier, pour l'affichage.
pub fn fetch_last_draws(conn: &Connection, game: Game, limit: u32) -> Result<Vec<Draw>> {
    fetch_rows(conn, game, "DESC", Some(limit))
}

/// Historique complet en ordre de date strictement croissant,
/// pour l'entraînement du modèle.
pub fn fetch_history(conn: &Connection, game: Game) -> Result<Vec<Draw>> {
    fetch_rows(conn, game, "ASC", None)
}

fn fetch_rows(conn: &Connection, game: Game, order: &str, limit: Option<u32>) -> Result<Vec<Draw>> {
    let limit_clause = match limit {
        Some(n) => format!(" LIMIT {}", n),
        None => String::new(),
    };
    match game {
        Game::Loto => {
            let sql = format!(
                "SELECT draw_id, date, ball_1, ball_2, ball_3, ball_4, ball_5, chance
                 FROM loto_draws ORDER BY date {order}, draw_id {order}{limit_clause}"
            );
            let mut stmt = conn.prepare(&sql)?;
            let draws = stmt
                .query_map([], |row| {
                    let mut balls = [
                        row.get::<_, u8>(2)?,
                        row.get::<_, u8>(3)?,
                        row.get::<_, u8>(4)?,
                        row.get::<_, u8>(5)?,
                        row.get::<_, u8>(6)?,
                    ];
                    balls.sort();
                    Ok(Draw {
                        draw_id: row.get(0)?,
                        date: row.get(1)?,
                        grid: Grid::Balls {
                            balls,
                            bonus: row.get::<_, u8>(7)?,
                        },
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(draws)
        }
        Game::Joker => {
            let sql = format!(
                "SELECT draw_id, date, digits
                 FROM joker_draws ORDER BY date {order}, draw_id {order}{limit_clause}"
            );
            let mut stmt = conn.prepare(&sql)?;
            let draws = stmt
                .query_map([], |row| {
                    let digits_str: String = row.get(2)?;
                    let digits: Vec<u8> = digits_str
                        .chars()
                        .filter_map(|c| c.to_digit(10).map(|d| d as u8))
                        .collect();
                    Ok(Draw {
                        draw_id: row.get(0)?,
                        date: row.get(1)?,
                        grid: Grid::Digits(digits),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(draws)
        }
    }
}

pub fn count_draws(conn: &Connection, game: Game) -> Result<u32> {
    let table = match game {
        Game::Loto => "loto_draws",
        Game::Joker => "joker_draws",
    };
    let count: u32 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
