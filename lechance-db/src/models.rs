use anyhow::{bail, Result};

/// Jeux supportés. Chaque jeu possède son propre domaine et sa propre table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Game {
    /// Loto : 5 boules distinctes (1-49) + 1 numéro chance (1-10).
    Loto,
    /// Joker : 7 chiffres (0-9), avec répétitions possibles.
    Joker,
}

impl Game {
    pub fn id(&self) -> &'static str {
        match self {
            Game::Loto => "loto",
            Game::Joker => "joker",
        }
    }

    pub fn domain(&self) -> GameDomain {
        match self {
            Game::Loto => GameDomain::Balls {
                lo: 1,
                hi: 49,
                bonus_lo: 1,
                bonus_hi: 10,
            },
            Game::Joker => GameDomain::Digits { len: 7 },
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Domaine d'un jeu : soit une suite de chiffres, soit 5 boules + bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameDomain {
    Digits { len: usize },
    Balls { lo: u8, hi: u8, bonus_lo: u8, bonus_hi: u8 },
}

impl GameDomain {
    /// Nombre de positions modélisées : `len` pour les chiffres,
    /// 6 pour les boules (5 boules triées + le bonus).
    pub fn positions(&self) -> usize {
        match self {
            GameDomain::Digits { len } => *len,
            GameDomain::Balls { .. } => 6,
        }
    }

    /// Taille du domaine d'états `k` à la position donnée.
    pub fn state_count(&self, pos: usize) -> usize {
        match self {
            GameDomain::Digits { .. } => 10,
            GameDomain::Balls { lo, hi, bonus_lo, bonus_hi } => {
                if pos < 5 {
                    (*hi - *lo + 1) as usize
                } else {
                    (*bonus_hi - *bonus_lo + 1) as usize
                }
            }
        }
    }

    /// Indice d'état (0..k) d'une valeur à une position, ou None hors domaine.
    pub fn state_index(&self, pos: usize, value: u8) -> Option<usize> {
        match self {
            GameDomain::Digits { .. } => {
                if value <= 9 {
                    Some(value as usize)
                } else {
                    None
                }
            }
            GameDomain::Balls { lo, hi, bonus_lo, bonus_hi } => {
                let (a, b) = if pos < 5 { (*lo, *hi) } else { (*bonus_lo, *bonus_hi) };
                if value >= a && value <= b {
                    Some((value - a) as usize)
                } else {
                    None
                }
            }
        }
    }

    /// Nombre total de grilles adressables : 10^len pour les chiffres,
    /// C(hi-lo+1, 5) × (taille du bonus) pour les boules.
    pub fn size(&self) -> u64 {
        match self {
            GameDomain::Digits { len } => 10u64.pow(*len as u32),
            GameDomain::Balls { lo, hi, bonus_lo, bonus_hi } => {
                let n = (*hi - *lo + 1) as u64;
                let combos = n * (n - 1) * (n - 2) * (n - 3) * (n - 4) / 120;
                combos * ((*bonus_hi - *bonus_lo + 1) as u64)
            }
        }
    }
}

/// Une grille : la forme commune aux tirages historiques et aux candidats.
/// L'ordre dérivé est l'ordre lexicographique naturel, utilisé pour
/// départager les égalités de score de façon déterministe.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grid {
    Digits(Vec<u8>),
    Balls { balls: [u8; 5], bonus: u8 },
}

impl Grid {
    /// Valeur à la position donnée (boules triées : 0 = la plus petite,
    /// 5 = le bonus).
    pub fn value_at(&self, pos: usize) -> u8 {
        match self {
            Grid::Digits(digits) => digits[pos],
            Grid::Balls { balls, bonus } => {
                if pos < 5 {
                    balls[pos]
                } else {
                    *bonus
                }
            }
        }
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grid::Digits(digits) => {
                for d in digits {
                    write!(f, "{}", d)?;
                }
                Ok(())
            }
            Grid::Balls { balls, bonus } => {
                let s = balls
                    .iter()
                    .map(|b| format!("{:2}", b))
                    .collect::<Vec<_>>()
                    .join(" - ");
                write!(f, "{} | {:2}", s, bonus)
            }
        }
    }
}

/// Un tirage historique daté.
#[derive(Debug, Clone)]
pub struct Draw {
    pub draw_id: String,
    pub date: String,
    pub grid: Grid,
}

/// Vérifie qu'une grille est bien formée pour un domaine donné :
/// bonne arité, valeurs dans les bornes, boules triées sans doublon.
pub fn validate_grid(grid: &Grid, domain: &GameDomain) -> Result<()> {
    match (grid, domain) {
        (Grid::Digits(digits), GameDomain::Digits { len }) => {
            if digits.len() != *len {
                bail!("Attendu {} chiffres, reçu {}", len, digits.len());
            }
            for &d in digits {
                if d > 9 {
                    bail!("Chiffre {} hors limites (0-9)", d);
                }
            }
            Ok(())
        }
        (Grid::Balls { balls, bonus }, GameDomain::Balls { lo, hi, bonus_lo, bonus_hi }) => {
            for &b in balls {
                if b < *lo || b > *hi {
                    bail!("Boule {} hors limites ({}-{})", b, lo, hi);
                }
            }
            if bonus < bonus_lo || bonus > bonus_hi {
                bail!("Numéro chance {} hors limites ({}-{})", bonus, bonus_lo, bonus_hi);
            }
            for w in balls.windows(2) {
                if w[0] == w[1] {
                    bail!("Boule en double : {}", w[0]);
                }
                if w[0] > w[1] {
                    bail!("Boules non triées : {} avant {}", w[0], w[1]);
                }
            }
            Ok(())
        }
        _ => bail!("Forme de grille incompatible avec le domaine du jeu"),
    }
}

/// Parse une chaîne de chiffres ("4178203") en grille Joker.
pub fn parse_digits(s: &str, len: usize) -> Result<Vec<u8>> {
    let digits: Vec<u8> = s
        .trim()
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect::<Option<_>>()
        .ok_or_else(|| anyhow::anyhow!("Chiffre invalide dans '{}'", s))?;
    if digits.len() != len {
        bail!("Attendu {} chiffres, reçu {} dans '{}'", len, digits.len(), s);
    }
    Ok(digits)
}
