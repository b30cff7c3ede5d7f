use thiserror::Error;

/// Taxonomie des erreurs du moteur. `Data` et `Config` sont fatales avant
/// tout calcul ; `Domain` marque un candidat mal formé, écarté et compté
/// sans interrompre l'exécution. La non-convergence de l'itération de
/// puissance n'est pas une erreur : elle est signalée dans le rapport.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("données insuffisantes : {0} tirage(s) valide(s), 2 minimum")]
    Data(usize),

    #[error("grille invalide : {0}")]
    Domain(String),

    #[error("configuration invalide : {0}")]
    Config(String),
}
