//! Resolução do diretório de relatório e da raiz do projeto.

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{TestDinoError, TestDinoResult};

/// Entrada que marca a raiz de um repositório git.
pub const GIT_MARKER: &str = ".git";

/// Quantos níveis acima do ponto de partida são examinados.
pub const MAX_GIT_ROOT_DEPTH: usize = 20;

static DRIVE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]:").expect("drive prefix pattern is valid"));

/// Caminhos resolvidos para um upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Ausente quando o chamador passou caminhos explícitos (json/html/trace).
    pub report_dir: Option<PathBuf>,
    /// Diretório de trabalho do uploader.
    pub project_root: PathBuf,
}

/// `true` para `/...` e `C:...`, nos dois estilos de sistema.
pub fn is_absolute_like(path: &str) -> bool {
    path.starts_with('/') || DRIVE_PREFIX.is_match(path)
}

/// Torna `path` absoluto em relação a `base` e remove `.` e `..` lexicalmente.
///
/// Não segue symlinks, então o resultado é comparável com o que o usuário digitou.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() && !normalized.has_root() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Procura a raiz git a partir de `start`, subindo no máximo [`MAX_GIT_ROOT_DEPTH`] níveis.
///
/// Caminhos relativos são resolvidos contra o diretório atual do processo.
/// Erros de permissão contam como "marcador ausente".
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    let mut current = absolutize(start, &base);

    for depth in 0..MAX_GIT_ROOT_DEPTH {
        if current.join(GIT_MARKER).exists() {
            tracing::trace!(root = %current.display(), depth, "git root found");
            return Some(current);
        }
        let Some(parent) = current.parent().map(Path::to_path_buf) else {
            break;
        };
        if parent == current {
            break;
        }
        current = parent;
    }

    None
}

/// Resolve o diretório do relatório e a raiz do projeto.
///
/// - absoluto: usado como está; raiz = git root do relatório, ou seu diretório pai;
/// - relativo: resolvido contra a git root de `cwd`, ou contra `cwd`.
///
/// Falha com [`TestDinoError::ReportDirNotFound`] se o diretório não existir.
pub fn resolve_report_dir(input: &str, cwd: &Path) -> TestDinoResult<ResolvedPaths> {
    let (report_dir, project_root, searched_from) = if is_absolute_like(input) {
        let report_dir = PathBuf::from(input);
        let project_root = find_git_root(&report_dir).unwrap_or_else(|| {
            report_dir
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| report_dir.clone())
        });
        (report_dir, project_root, cwd.to_path_buf())
    } else {
        match find_git_root(cwd) {
            Some(git_root) => {
                let report_dir = absolutize(Path::new(input), &git_root);
                (report_dir, git_root.clone(), git_root)
            }
            None => {
                let report_dir = absolutize(Path::new(input), cwd);
                (report_dir, cwd.to_path_buf(), cwd.to_path_buf())
            }
        }
    };

    if !report_dir.is_dir() {
        return Err(TestDinoError::ReportDirNotFound {
            resolved: report_dir,
            requested: input.to_string(),
            searched_from,
        });
    }

    Ok(ResolvedPaths {
        report_dir: Some(report_dir),
        project_root,
    })
}

/// Raiz do projeto quando o chamador passou um caminho explícito em vez de diretório.
///
/// Não verifica existência; sem git root, a raiz é `cwd`.
pub fn resolve_override_root(override_path: &str, cwd: &Path) -> ResolvedPaths {
    let resolved = if is_absolute_like(override_path) {
        PathBuf::from(override_path)
    } else {
        let base = find_git_root(cwd).unwrap_or_else(|| cwd.to_path_buf());
        absolutize(Path::new(override_path), &base)
    };

    ResolvedPaths {
        report_dir: None,
        project_root: find_git_root(&resolved).unwrap_or_else(|| cwd.to_path_buf()),
    }
}
