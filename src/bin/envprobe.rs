//! Print the native library search path and check that the optional
//! image-processing and numeric libraries can be loaded.
//!
//! ```text
//! envprobe              # probes vips, then openblas
//! envprobe vips blas    # probes the given names in order
//! ```

use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_LIBRARIES: [&str; 2] = ["vips", "openblas"];

#[cfg(target_os = "windows")]
const SEARCH_PATH_VAR: &str = "PATH";
#[cfg(target_os = "macos")]
const SEARCH_PATH_VAR: &str = "DYLD_LIBRARY_PATH";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const SEARCH_PATH_VAR: &str = "LD_LIBRARY_PATH";

/// Runtime sonames shipped without the `-dev` package.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const KNOWN_VERSIONS: &[(&str, &[&str])] = &[
    ("vips", &["libvips.so.42"]),
    ("openblas", &["libopenblas.so.0"]),
];
#[cfg(target_os = "macos")]
const KNOWN_VERSIONS: &[(&str, &[&str])] = &[
    ("vips", &["libvips.42.dylib"]),
    ("openblas", &["libopenblas.0.dylib"]),
];
#[cfg(target_os = "windows")]
const KNOWN_VERSIONS: &[(&str, &[&str])] = &[
    ("vips", &["libvips-42.dll"]),
    ("openblas", &["libopenblas.dll"]),
];

#[derive(Debug, Error)]
#[error("{0}")]
struct ProbeError(String);

/// Something that can try to bring a shared library into the process.
trait LibraryLoader {
    fn open(&self, filename: &OsStr) -> Result<(), ProbeError>;
}

/// Loads through the platform dynamic linker and unloads right away.
struct NativeLoader;

impl LibraryLoader for NativeLoader {
    fn open(&self, filename: &OsStr) -> Result<(), ProbeError> {
        log::debug!("loading {}", filename.to_string_lossy());
        // SAFETY: the library is dropped immediately and no symbols are
        // resolved; only its initialisers run.
        let lib = unsafe { libloading::Library::new(filename) }
            .map_err(|e| ProbeError(e.to_string()))?;
        drop(lib);
        Ok(())
    }
}

/// Loader directories searched after the environment variable.
fn default_dirs() -> Vec<PathBuf> {
    #[cfg(target_os = "windows")]
    let dirs: Vec<String> = Vec::new();
    #[cfg(target_os = "macos")]
    let dirs: Vec<String> = vec!["/usr/local/lib".into(), "/opt/homebrew/lib".into(), "/usr/lib".into()];
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let dirs: Vec<String> = vec![
        format!("/lib/{}-linux-gnu", std::env::consts::ARCH),
        format!("/usr/lib/{}-linux-gnu", std::env::consts::ARCH),
        "/usr/local/lib".into(),
        "/lib64".into(),
        "/usr/lib64".into(),
        "/lib".into(),
        "/usr/lib".into(),
    ];
    dirs.into_iter().map(PathBuf::from).collect()
}

/// Environment entries first, then `defaults` not already listed.
fn search_path(raw: Option<OsString>, defaults: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut path: Vec<PathBuf> = raw
        .map(|v| std::env::split_paths(&v).filter(|p| !p.as_os_str().is_empty()).collect())
        .unwrap_or_default();
    for dir in defaults {
        if !path.contains(&dir) {
            path.push(dir);
        }
    }
    path
}

/// `lib<name>.so.*` style glob for versioned files in one directory.
fn versioned_glob(dir: &std::path::Path, name: &str) -> Option<String> {
    let dir = glob::Pattern::escape(dir.to_str()?);
    if cfg!(target_os = "windows") {
        None
    } else if cfg!(target_os = "macos") {
        Some(format!("{dir}/lib{name}.*.dylib"))
    } else {
        Some(format!("{dir}/lib{name}.so.*"))
    }
}

/// File names to try for `name`, in order: the bare platform name, known
/// runtime versions, then versioned files found in `search`.
fn candidates(name: &str, search: &[PathBuf]) -> Vec<OsString> {
    let mut out = vec![libloading::library_filename(name)];
    if let Some((_, versions)) = KNOWN_VERSIONS.iter().find(|(lib, _)| *lib == name) {
        out.extend(versions.iter().map(OsString::from));
    }
    for dir in search {
        let Some(pattern) = versioned_glob(dir, name) else {
            continue;
        };
        let Ok(paths) = glob::glob(&pattern) else {
            continue;
        };
        let mut found: Vec<PathBuf> = paths.filter_map(Result::ok).collect();
        found.sort();
        out.extend(found.into_iter().map(PathBuf::into_os_string));
    }
    let mut seen = Vec::with_capacity(out.len());
    out.retain(|c| {
        if seen.contains(c) {
            false
        } else {
            seen.push(c.clone());
            true
        }
    });
    out
}

/// First candidate that loads wins; otherwise the last failure is reported.
fn probe_library<L: LibraryLoader>(
    loader: &L,
    name: &str,
    search: &[PathBuf],
) -> Result<OsString, ProbeError> {
    let mut last = ProbeError(format!("no candidate file names for {name}"));
    for candidate in candidates(name, search) {
        match loader.open(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) => {
                log::debug!("{}: {e}", candidate.to_string_lossy());
                last = e;
            }
        }
    }
    Err(last)
}

/// Search path first, then one line per library. Load failures never stop
/// the remaining probes.
fn run_probe<L, W>(loader: &L, libraries: &[String], search: &[PathBuf], out: &mut W) -> io::Result<()>
where
    L: LibraryLoader,
    W: Write,
{
    writeln!(out, "Library search path: {search:?}")?;

    for name in libraries {
        match probe_library(loader, name, search) {
            Ok(file) => {
                log::debug!("{name} loaded from {}", file.to_string_lossy());
                writeln!(out, "{name}: OK")?;
            }
            Err(e) => {
                log::debug!("{name} unavailable: {e}");
                writeln!(out, "{name} error: {e}")?;
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut libraries: Vec<String> = std::env::args().skip(1).collect();
    if libraries.is_empty() {
        libraries = DEFAULT_LIBRARIES.iter().map(|s| s.to_string()).collect();
    }

    let search = search_path(std::env::var_os(SEARCH_PATH_VAR), default_dirs());
    let stdout = io::stdout();
    run_probe(&NativeLoader, &libraries, &search, &mut stdout.lock())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Opens only the listed file names, records every attempt.
    struct FakeLoader {
        loadable: Vec<OsString>,
        attempts: RefCell<Vec<OsString>>,
    }

    impl FakeLoader {
        fn new(loadable: &[&str]) -> Self {
            FakeLoader {
                loadable: loadable.iter().map(OsString::from).collect(),
                attempts: RefCell::new(Vec::new()),
            }
        }
    }

    impl LibraryLoader for FakeLoader {
        fn open(&self, filename: &OsStr) -> Result<(), ProbeError> {
            self.attempts.borrow_mut().push(filename.to_os_string());
            if self.loadable.iter().any(|f| f == filename) {
                Ok(())
            } else {
                Err(ProbeError(format!(
                    "{}: cannot open shared object file",
                    filename.to_string_lossy()
                )))
            }
        }
    }

    fn bare(name: &str) -> String {
        libloading::library_filename(name).to_string_lossy().into_owned()
    }

    fn names() -> Vec<String> {
        DEFAULT_LIBRARIES.iter().map(|s| s.to_string()).collect()
    }

    fn probe(loader: &FakeLoader) -> Vec<String> {
        let mut out = Vec::new();
        run_probe(loader, &names(), &[], &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn search_path_is_printed_once_and_first() {
        let bare_openblas = bare("openblas");
        for loadable in [vec![], vec![bare_openblas.as_str()]] {
            let lines = probe(&FakeLoader::new(&loadable));
            assert!(lines[0].starts_with("Library search path: "));
            let n = lines
                .iter()
                .filter(|l| l.starts_with("Library search path"))
                .count();
            assert_eq!(n, 1);
        }
    }

    #[test]
    fn all_available() {
        let (vips, openblas) = (bare("vips"), bare("openblas"));
        let lines = probe(&FakeLoader::new(&[vips.as_str(), openblas.as_str()]));
        assert_eq!(&lines[1..], ["vips: OK", "openblas: OK"]);
    }

    #[test]
    fn first_failure_does_not_stop_second() {
        let openblas = bare("openblas");
        let loader = FakeLoader::new(&[openblas.as_str()]);
        let lines = probe(&loader);
        assert!(lines[1].starts_with("vips error: "));
        assert!(lines[1].ends_with("cannot open shared object file"));
        assert_eq!(lines[2], "openblas: OK");

        let attempts = loader.attempts.into_inner();
        let first_openblas = attempts
            .iter()
            .position(|a| a.to_string_lossy().contains("openblas"))
            .unwrap();
        assert!(attempts[..first_openblas]
            .iter()
            .all(|a| a.to_string_lossy().contains("vips")));
    }

    #[test]
    fn versioned_name_loads_when_bare_name_fails() {
        let (_, versions) = KNOWN_VERSIONS
            .iter()
            .find(|(lib, _)| *lib == "vips")
            .unwrap();
        let loader = FakeLoader::new(&[versions[0]]);

        let loaded = probe_library(&loader, "vips", &[]).unwrap();
        assert_eq!(loaded, OsString::from(versions[0]));

        let attempts = loader.attempts.into_inner();
        assert_eq!(attempts[0], libloading::library_filename("vips"));
        assert_eq!(attempts.last(), Some(&OsString::from(versions[0])));
    }

    #[test]
    fn last_error_is_reported_when_nothing_loads() {
        let loader = FakeLoader::new(&[]);
        let err = probe_library(&loader, "vips", &[]).unwrap_err();
        let last = loader.attempts.into_inner().pop().unwrap();
        assert_eq!(
            err.to_string(),
            format!("{}: cannot open shared object file", last.to_string_lossy())
        );
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn versioned_files_in_search_path_are_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let soname = dir.path().join("libfoo.so.3");
        std::fs::write(&soname, b"").unwrap();
        std::fs::write(dir.path().join("libfoobar.so.1"), b"").unwrap();

        let found = candidates("foo", &[dir.path().to_path_buf()]);
        assert_eq!(found[0], OsString::from("libfoo.so"));
        assert!(found.contains(&soname.into_os_string()));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn search_path_appends_loader_defaults() {
        let defaults = vec![PathBuf::from("/usr/lib"), PathBuf::from("/lib")];
        assert_eq!(search_path(None, defaults.clone()), defaults);

        let joined = std::env::join_paths(["/a", "/usr/lib"]).unwrap();
        assert_eq!(
            search_path(Some(joined), defaults),
            vec![PathBuf::from("/a"), PathBuf::from("/usr/lib"), PathBuf::from("/lib")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn default_dirs_are_never_empty() {
        assert!(!default_dirs().is_empty());
    }

    #[test]
    fn native_loader_reports_unknown_library() {
        let err = probe_library(&NativeLoader, "definitely-not-a-real-library-xyz", &[])
            .unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
