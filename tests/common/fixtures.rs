//! Test fixture creation for the engagement source file

use super::constants::*;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A small pt-BR export covering two years, a bad date, a bad vote cell
/// and a repeated comment id.
const FIXTURE_CSV: &str = "\
Semana,ID,Ação,Rede,Assunto,Postagem,Votos
05/01/2024,c1,Comentário,Instagram,Promo,https://instagram.com/p/1,3
12/01/2024,c2,Comentário,Instagram,Promo,,5
01/02/2024,s1,Compartilhamento,Facebook,Notícias,https://facebook.com/p/2,1
2023-12-30,c3,Comentário,Facebook,Odds,,2
sem data,c4,Comentário,Instagram,Promo,,7
15/01/2024,c1,Comentário,Instagram,Odds,,abc
";

/// Writes the fixture source into a fresh temp dir
/// Returns (temp_dir, source_path)
pub fn create_test_source() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let source_path = dir.path().join(SOURCE_FILE_NAME);
    fs::write(&source_path, FIXTURE_CSV)?;
    Ok((dir, source_path))
}
