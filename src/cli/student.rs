use std::{
    io::{BufRead, Write},
    path::PathBuf,
    str::FromStr,
};

use crate::{
    cli::{flush_toasts, position, prompt, split_words},
    error::PortalError,
    model::{
        catalog::{self, BRANCHES, COURSES},
        draft::{FileKind, MemberField, SelectField, TextField},
    },
    storage::Storage,
    wizard::{LAST_STEP, Wizard},
};

const HELP: &str = "\
commands:
  show                               print the current step
  set <field> <value>                rollNumber, section, name, batchInfo, remarks
  select <branch|course> <value>     choose from the listed options
  file <ppt|ieee> <path>             attach a document
  member add                         add a batch member (maximum 5)
  member set <n> <name|reg> <value>  edit member n
  member remove <n>                  remove member n (not the first)
  next | prev                        move between steps
  submit                             send the submission (final step)
  quit";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Show,
    Set(TextField, String),
    Select(SelectField, String),
    File(FileKind, PathBuf),
    MemberAdd,
    MemberSet(usize, MemberField, String),
    MemberRemove(usize),
    Next,
    Prev,
    Submit,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = PortalError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (words, rest) = split_words(line, 2);
        let usage = || PortalError::InvalidInput(format!("could not understand '{line}', try 'help'"));

        let command = match words.as_slice() {
            ["show"] => Command::Show,
            ["next"] => Command::Next,
            ["prev"] => Command::Prev,
            ["submit"] => Command::Submit,
            ["help"] => Command::Help,
            ["quit"] | ["exit"] => Command::Quit,
            ["set", field] => Command::Set(field.parse()?, rest.to_owned()),
            ["select", field] if !rest.is_empty() => Command::Select(field.parse()?, rest.to_owned()),
            ["file", kind] if !rest.is_empty() => Command::File(kind.parse()?, PathBuf::from(rest)),
            ["member", "add"] => Command::MemberAdd,
            ["member", "remove"] => Command::MemberRemove(position(rest)?),
            ["member", "set"] => {
                let (args, value) = split_words(rest, 2);
                let [n, field] = args.as_slice() else {
                    return Err(usage());
                };
                Command::MemberSet(position(n)?, field.parse()?, value.to_owned())
            }
            _ => return Err(usage()),
        };

        Ok(command)
    }
}

/// Runs the wizard until `quit` or end of input.
pub async fn run<S: Storage, R: BufRead, W: Write>(
    wizard: &mut Wizard<S>,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<()> {
    render(wizard, output)?;

    while let Some(line) = prompt(input, output, &format!("step {}", wizard.step()))? {
        let command = match line.parse::<Command>() {
            Ok(c) => c,
            Err(e) => {
                writeln!(output, "{e}")?;
                continue;
            }
        };

        let step_before = wizard.step();
        match command {
            Command::Show => render(wizard, output)?,
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Quit => break,
            Command::Set(field, value) => wizard.set_field(field, value),
            Command::Select(field, value) => {
                let _ = wizard.set_select(field, &value);
            }
            Command::File(kind, path) => {
                let _ = wizard.set_file(kind, path);
            }
            Command::MemberAdd => {
                if !wizard.can_add_member() {
                    writeln!(output, "A batch has at most 5 members")?;
                }
                wizard.add_batch_member();
            }
            Command::MemberSet(index, field, value) => wizard.update_batch_member(index, field, value),
            Command::MemberRemove(index) => {
                if index == 0 {
                    writeln!(output, "The first member cannot be removed")?;
                }
                wizard.remove_batch_member(index);
            }
            Command::Next => {
                if let Err(PortalError::Validation(missing)) = wizard.advance() {
                    writeln!(output, "Still missing: {}", missing.join(", "))?;
                }
            }
            Command::Prev => {
                wizard.retreat();
            }
            Command::Submit => {
                let _ = wizard.submit().await;
            }
        }

        flush_toasts(wizard.toasts_mut(), output)?;
        if wizard.step() != step_before {
            render(wizard, output)?;
        }
    }

    Ok(())
}

fn render<S: Storage, W: Write>(wizard: &Wizard<S>, output: &mut W) -> std::io::Result<()> {
    let draft = wizard.draft();
    writeln!(
        output,
        "Step {} of {LAST_STEP}: {} ({}%)",
        wizard.step(),
        wizard.step_title(),
        wizard.progress()
    )?;

    let show = |v: &str| if v.is_empty() { "-".to_string() } else { v.to_string() };
    match wizard.step() {
        1 => {
            let branch = catalog::label_of(BRANCHES, &draft.branch).unwrap_or("-");
            let course = catalog::label_of(COURSES, &draft.course).unwrap_or("-");
            writeln!(output, "  branch:     {branch}")?;
            writeln!(output, "  course:     {course}")?;
            writeln!(output, "  rollNumber: {}", show(&draft.roll_number))?;
            writeln!(output, "  section:    {}", show(&draft.section))?;
            let options = |c: &[catalog::CatalogEntry]| {
                c.iter().map(|e| format!("{} ({})", e.value, e.label)).collect::<Vec<_>>().join(", ")
            };
            writeln!(output, "  branches: {}", options(BRANCHES))?;
            writeln!(output, "  courses:  {}", options(COURSES))?;
        }
        2 => {
            writeln!(output, "  name:      {}", show(&draft.name))?;
            writeln!(output, "  batchInfo: {}", show(&draft.batch_info))?;
            for kind in [FileKind::Ppt, FileKind::Ieee] {
                let chosen = draft.file(kind).map(|f| f.filename.as_str()).unwrap_or("-");
                writeln!(output, "  {kind}: {chosen}")?;
            }
        }
        3 => {
            for (i, member) in draft.batch_members.iter().enumerate() {
                writeln!(
                    output,
                    "  member {}: {} / {}",
                    i + 1,
                    show(&member.name),
                    show(&member.registration_number)
                )?;
            }
            if let Some(warning) = wizard.member_warning() {
                writeln!(output, "  {warning}")?;
            }
        }
        _ => writeln!(output, "  remarks (optional): {}", show(&draft.remarks))?,
    }

    Ok(())
}
