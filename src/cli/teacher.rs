use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    cli::{flush_toasts, position, prompt, split_words},
    dashboard::{
        Dashboard,
        filter::{Selection, SortOrder},
    },
    error::PortalError,
    model::{draft::FileKind, submission_record::SubmissionRecord},
    storage::Storage,
};

const HELP: &str = "\
commands:
  login <email> <password>
  refresh                          fetch submissions again
  search [text]                    filter by batch, member name or registration number
  branch <value|all>               filter by branch
  course <value|all>               filter by course
  sort <newest|oldest>
  list                             show matching submissions
  view <n> <ppt|ieee>              print the address of a file
  download <n> <ppt|ieee> [dir]    save a file locally
  logout
  quit";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Login(String, String),
    Refresh,
    Search(String),
    Branch(Selection),
    Course(Selection),
    Sort(SortOrder),
    List,
    View(usize, FileKind),
    Download(usize, FileKind, Option<PathBuf>),
    Logout,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = PortalError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (words, rest) = split_words(line, 3);
        let usage = || PortalError::InvalidInput(format!("could not understand '{line}', try 'help'"));

        let command = match words.as_slice() {
            ["login", email, password] if rest.is_empty() => {
                Command::Login(email.to_string(), password.to_string())
            }
            ["refresh"] => Command::Refresh,
            ["search", ..] => Command::Search(line.trim_start()["search".len()..].trim().to_owned()),
            ["branch", value] => Command::Branch(value.parse()?),
            ["course", value] => Command::Course(value.parse()?),
            ["sort", order] => Command::Sort(order.parse()?),
            ["list"] => Command::List,
            ["view", n, kind] => Command::View(position(n)?, kind.parse()?),
            ["download", n, kind] => {
                let dir = (!rest.is_empty()).then(|| PathBuf::from(rest));
                Command::Download(position(n)?, kind.parse()?, dir)
            }
            ["logout"] => Command::Logout,
            ["help"] => Command::Help,
            ["quit"] | ["exit"] => Command::Quit,
            _ => return Err(usage()),
        };

        Ok(command)
    }
}

/// Runs the dashboard until `quit` or end of input.
pub async fn run<S: Storage, R: BufRead, W: Write>(
    dashboard: &mut Dashboard<S>,
    download_dir: &Path,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<()> {
    flush_toasts(dashboard.toasts_mut(), output)?;
    if dashboard.is_authenticated() {
        render(dashboard, output)?;
    } else {
        writeln!(output, "Teacher Login: sign in to access your dashboard")?;
    }

    while let Some(line) = prompt(input, output, "dashboard")? {
        let command = match line.parse::<Command>() {
            Ok(c) => c,
            Err(e) => {
                writeln!(output, "{e}")?;
                continue;
            }
        };

        let open = matches!(command, Command::Login(..) | Command::Help | Command::Quit);
        if !open && !dashboard.is_authenticated() {
            writeln!(output, "Log in first")?;
            continue;
        }

        match command {
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Quit => break,
            Command::Login(email, password) => {
                if dashboard.login(&email, &password).await.is_ok() {
                    flush_toasts(dashboard.toasts_mut(), output)?;
                    render(dashboard, output)?;
                }
            }
            Command::Refresh => {
                if dashboard.fetch_submissions().await.is_ok() {
                    render(dashboard, output)?;
                }
            }
            Command::Search(text) => {
                dashboard.set_search(text);
                render(dashboard, output)?;
            }
            Command::Branch(selection) => {
                dashboard.set_branch_filter(selection);
                render(dashboard, output)?;
            }
            Command::Course(selection) => {
                dashboard.set_course_filter(selection);
                render(dashboard, output)?;
            }
            Command::Sort(order) => {
                dashboard.set_sort(order);
                render(dashboard, output)?;
            }
            Command::List => render(dashboard, output)?,
            Command::View(n, kind) => match dashboard.visible().get(n) {
                Some(record) => writeln!(output, "{}", dashboard.file_url(record, kind))?,
                None => writeln!(output, "No submission #{}", n + 1)?,
            },
            Command::Download(n, kind, dir) => {
                let Some(file) = dashboard.visible().get(n).map(|r| r.file(kind).clone()) else {
                    writeln!(output, "No submission #{}", n + 1)?;
                    continue;
                };
                let dir = dir.unwrap_or_else(|| download_dir.to_path_buf());
                let _ = dashboard.download(file, &dir).await;
            }
            Command::Logout => {
                dashboard.logout();
                writeln!(output, "Logged out")?;
            }
        }

        flush_toasts(dashboard.toasts_mut(), output)?;
    }

    Ok(())
}

fn render<S: Storage, W: Write>(dashboard: &Dashboard<S>, output: &mut W) -> std::io::Result<()> {
    if let Some(teacher) = dashboard.teacher() {
        writeln!(output, "Teacher Dashboard ({})", teacher.name)?;
    } else {
        writeln!(output, "Teacher Dashboard")?;
    }
    writeln!(output, "{} submissions found", dashboard.submissions().len())?;

    let query = dashboard.query();
    if !query.search.is_empty() {
        writeln!(output, "search: \"{}\"", query.search)?;
    }
    writeln!(
        output,
        "branch {} | course {} | sort {}",
        query.branch, query.course, query.sort
    )?;

    let visible = dashboard.visible();
    if visible.is_empty() {
        writeln!(output, "No submissions found matching your criteria")?;
    }
    for (i, record) in visible.iter().enumerate() {
        write_record(output, i + 1, record)?;
    }

    Ok(())
}

fn write_record<W: Write>(output: &mut W, n: usize, record: &SubmissionRecord) -> std::io::Result<()> {
    writeln!(
        output,
        "#{n} {} | {} - {} | submitted {}",
        record.batch_info,
        record.branch.to_uppercase(),
        record.course,
        record.created_at.format("%Y-%m-%d")
    )?;
    for member in &record.batch_members {
        writeln!(output, "    {:<24} {}", member.name, member.registration_number)?;
    }
    if !record.remarks.is_empty() {
        writeln!(output, "    remarks: {}", record.remarks)?;
    }
    Ok(())
}
