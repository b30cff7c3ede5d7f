mod display;
mod export;
mod import;
mod stats;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use lechance_db::db::{count_draws, db_path, fetch_last_draws, migrate, open_db};
use lechance_db::models::Game;
use lechance_db::source::source_for;
use lechance_engine::rng::date_seed;
use lechance_engine::{ranker, run_with, CandidateMode, HistorySeries, RngKind, ScoreConfig};

use crate::display::{display_draws, display_import_summary, display_ranked, display_report};
use crate::export::{export_all, ExportPlan};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GameArg {
    Loto,
    Joker,
}

impl From<GameArg> for Game {
    fn from(arg: GameArg) -> Self {
        match arg {
            GameArg::Loto => Game::Loto,
            GameArg::Joker => Game::Joker,
        }
    }
}

#[derive(Parser)]
#[command(name = "lechance", about = "Scoring statistique de grilles Loto et Joker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV officiel
    Import {
        /// Jeu concerné
        #[arg(short, long, value_enum)]
        game: GameArg,

        /// Chemin vers le fichier CSV (séparateur ';')
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Jeu concerné
        #[arg(short, long, value_enum)]
        game: GameArg,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher les statistiques (fréquences et retards)
    Stats {
        /// Jeu concerné
        #[arg(short, long, value_enum)]
        game: GameArg,

        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "100")]
        window: u32,
    },

    /// Scorer et classer des grilles candidates
    Score {
        /// Jeu concerné
        #[arg(short, long, value_enum)]
        game: GameArg,

        /// Générateur pseudo-aléatoire
        #[arg(long, value_enum, default_value = "mt")]
        rng: RngKind,

        /// Seed pour la reproductibilité (défaut : date du jour YYYYMMDD)
        #[arg(long)]
        seed: Option<u64>,

        /// Lissage de Laplace sur les comptages de transitions
        #[arg(long, default_value = "1.0")]
        alpha_smooth: f64,

        /// Amortissement de l'itération de puissance, dans (0, 1]
        #[arg(long, default_value = "0.85")]
        damping: f64,

        /// Tolérance de convergence (norme L1)
        #[arg(long, default_value = "1e-10")]
        epsilon: f64,

        /// Nombre maximal d'itérations de puissance
        #[arg(long, default_value = "1000")]
        max_steps: usize,

        /// Nombre de grilles candidates à échantillonner
        #[arg(short, long, default_value = "1000")]
        candidates: usize,

        /// Énumérer tout le domaine au lieu d'échantillonner
        /// (petits domaines de chiffres uniquement)
        #[arg(long, conflicts_with = "candidates")]
        enumerate: bool,

        /// Poids w du mélange markov/prior, dans [0, 1]
        #[arg(short, long, default_value = "0.5")]
        weight: f64,

        /// Taille du classement affiché et exporté en top-N
        #[arg(short, long, default_value = "10")]
        top: usize,

        /// Fenêtre de la pénalité de récence (boules uniquement)
        #[arg(long, default_value = "10")]
        recency_window: usize,

        /// Intensité de la pénalité de récence (boules uniquement)
        #[arg(long, default_value = "0.05")]
        recency_strength: f64,

        /// Poids du bonus de popularité marginale (boules uniquement)
        #[arg(long, default_value = "0.1")]
        popularity_weight: f64,

        /// Exporter le classement complet (CSV)
        #[arg(long)]
        out_ranked: Option<PathBuf>,

        /// Exporter le top-N (CSV)
        #[arg(long)]
        out_top: Option<PathBuf>,

        /// Exporter le rapport de diagnostic (texte)
        #[arg(long)]
        out_report: Option<PathBuf>,

        /// Exporter le rapport de diagnostic (JSON)
        #[arg(long)]
        out_json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { game, file } => cmd_import(&conn, game.into(), &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { game, last } => cmd_list(&conn, game.into(), last),
        Command::Stats { game, window } => cmd_stats(&conn, game.into(), window),
        Command::Score {
            game,
            rng,
            seed,
            alpha_smooth,
            damping,
            epsilon,
            max_steps,
            candidates,
            enumerate,
            weight,
            top,
            recency_window,
            recency_strength,
            popularity_weight,
            out_ranked,
            out_top,
            out_report,
            out_json,
        } => {
            let config = ScoreConfig {
                rng_kind: rng,
                seed,
                alpha_smooth,
                damping,
                epsilon,
                max_steps,
                mode: if enumerate {
                    CandidateMode::Enumerate
                } else {
                    CandidateMode::Sample(candidates)
                },
                weight,
                top_n: top,
                popularity_weight,
                recency_window,
                recency_strength,
            };
            let plan = ExportPlan {
                ranked_all: out_ranked,
                ranked_top: out_top,
                report_txt: out_report,
                report_json: out_json,
            };
            cmd_score(&conn, game.into(), config, &plan)
        }
    }
}

fn cmd_import(conn: &lechance_db::rusqlite::Connection, game: Game, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, game, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &lechance_db::rusqlite::Connection, game: Game, last: u32) -> Result<()> {
    let n = count_draws(conn, game)?;
    if n == 0 {
        println!("Base vide pour {}. Lancez d'abord : lechance import --game {}", game, game);
        return Ok(());
    }
    let draws = fetch_last_draws(conn, game, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &lechance_db::rusqlite::Connection, game: Game, window: u32) -> Result<()> {
    let n = count_draws(conn, game)?;
    if n == 0 {
        println!("Base vide pour {}. Lancez d'abord : lechance import --game {}", game, game);
        return Ok(());
    }
    let effective_window = window.min(n);
    let draws = fetch_last_draws(conn, game, effective_window)?;

    match game.domain() {
        lechance_db::models::GameDomain::Balls { .. } => {
            let stats = stats::ball_stats(&draws, &game.domain());
            stats::display_ball_stats(&stats, effective_window);
        }
        lechance_db::models::GameDomain::Digits { len } => {
            let counts = stats::digit_position_counts(&draws, len);
            stats::display_digit_stats(&counts, effective_window);
        }
    }
    Ok(())
}

fn cmd_score(
    conn: &lechance_db::rusqlite::Connection,
    game: Game,
    mut config: ScoreConfig,
    plan: &ExportPlan,
) -> Result<()> {
    let n = count_draws(conn, game)?;
    if n == 0 {
        bail!("Base vide pour {}. Lancez d'abord : lechance import --game {}", game, game);
    }

    let sequence = source_for(conn, game).load_sequence()?;
    let series = HistorySeries::new(game.domain(), sequence)?;

    // Seed résolu ici pour pouvoir l'annoncer avant le calcul
    if config.seed.is_none() && config.rng_kind != RngKind::Sys {
        let ds = date_seed();
        println!("(Seed du jour : {ds})");
        config.seed = Some(ds);
    }

    let expected = match config.mode {
        CandidateMode::Sample(n) => n as u64,
        CandidateMode::Enumerate => game.domain().size(),
    };
    let pb = ProgressBar::new(expected);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb.set_message("scoring");

    let outcome = run_with(game.id(), &series, &config, |done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    })?;
    pb.finish_and_clear();

    display_report(&outcome.report);
    display_ranked(
        ranker::top_n(&outcome.ranked, config.top_n),
        &format!("Top {} sur {} candidats", config.top_n.min(outcome.ranked.len()), outcome.ranked.len()),
    );

    let summary = export_all(&outcome, config.top_n, plan);
    for path in &summary.written {
        println!("Écrit : {}", path.display());
    }
    for (path, err) in &summary.failed {
        eprintln!("Échec de l'export {} : {}", path.display(), err);
    }
    if !summary.all_ok() {
        bail!("{} artefact(s) non écrit(s)", summary.failed.len());
    }

    Ok(())
}
