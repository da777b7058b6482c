mod cli;

pub(crate) use cli::as_cli;

/// Splits the global `--db <path>` option off the argument list.
pub(crate) fn take_db_flag(args: &[String]) -> (Option<String>, Vec<String>) {
    let mut db = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--db" {
            db = iter.next().cloned();
        } else if let Some(path) = arg.strip_prefix("--db=") {
            db = Some(path.to_string());
        } else {
            rest.push(arg.clone());
        }
    }
    (db, rest)
}
