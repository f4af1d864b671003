use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use assess_core::model::{AssessmentSettings, AssessmentTopic, StudyLevel};
use services::{
    AdvanceOutcome, AssessmentLoopService, AssessmentSession, ChatQuestionGenerator, Clock,
    QuestionGenerator, ScriptedGenerator, SessionError, Submission,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLevel { raw: String },
    InvalidMaxLength { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLevel { raw } => {
                write!(f, "invalid --level value: {raw} (expected school or college)")
            }
            ArgsError::InvalidMaxLength { raw } => write!(f, "invalid --max-length value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- --topic <name> [--max-length <n>] [--offline]");
    eprintln!("  cargo run -p app -- --level <school|college> --standard <std> \\");
    eprintln!("                      [--course <course>] --topic <subject>");
    eprintln!("  cargo run -p app -- --skills <a,b,c>");
    eprintln!();
    eprintln!("Commands while testing:");
    eprintln!("  a-d answer, n next, p previous, s submit, q quit");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ASSESS_TOPIC, ASSESS_AI_API_KEY, ASSESS_AI_BASE_URL, ASSESS_AI_MODEL, RUST_LOG");
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    topic: Option<String>,
    level: Option<StudyLevel>,
    standard: Option<String>,
    course: Option<String>,
    skills: Option<String>,
    max_length: Option<usize>,
    offline: bool,
    help: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--topic" => parsed.topic = Some(require_value(args, "--topic")?),
                "--level" => {
                    let value = require_value(args, "--level")?;
                    parsed.level = Some(match value.trim().to_ascii_lowercase().as_str() {
                        "school" => StudyLevel::School,
                        "college" => StudyLevel::College,
                        _ => return Err(ArgsError::InvalidLevel { raw: value }),
                    });
                }
                "--standard" => parsed.standard = Some(require_value(args, "--standard")?),
                "--course" => parsed.course = Some(require_value(args, "--course")?),
                "--skills" => parsed.skills = Some(require_value(args, "--skills")?),
                "--max-length" => {
                    let value = require_value(args, "--max-length")?;
                    let n = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidMaxLength { raw: value.clone() })?;
                    parsed.max_length = Some(n);
                }
                "--offline" => parsed.offline = true,
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    /// Skills win over a subject, a subject wins over a free topic.
    fn into_topic(
        self,
        env_topic: Option<String>,
    ) -> Result<AssessmentTopic, Box<dyn std::error::Error>> {
        let name = self.topic.or(env_topic).unwrap_or_default();
        if let Some(skills) = self.skills {
            return Ok(AssessmentTopic::skills(skills.split(','))?);
        }
        if let Some(level) = self.level {
            return Ok(AssessmentTopic::subject(
                level,
                self.standard.unwrap_or_default(),
                self.course,
                name,
            )?);
        }
        Ok(AssessmentTopic::free(name)?)
    }
}

enum Input {
    Answer(usize),
    Next,
    Previous,
    Submit,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    match line.trim().to_ascii_lowercase().as_str() {
        "a" => Input::Answer(0),
        "b" => Input::Answer(1),
        "c" => Input::Answer(2),
        "d" => Input::Answer(3),
        "n" | "next" => Input::Next,
        "p" | "prev" | "previous" => Input::Previous,
        "s" | "submit" => Input::Submit,
        "q" | "quit" => Input::Quit,
        _ => Input::Unknown,
    }
}

fn option_letter(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

fn print_question(session: &AssessmentSession) {
    let Some(question) = session.current_question() else {
        return;
    };
    let progress = session.progress();
    println!();
    println!(
        "Question {} of {} ({})",
        progress.cursor + 1,
        progress.available,
        question.difficulty()
    );
    println!("{}", question.text());
    let chosen = session.answers().get(progress.cursor);
    for (index, option) in question.options().iter().enumerate() {
        let marker = if chosen == Some(index) { '*' } else { ' ' };
        println!(" {marker}{}. {option}", option_letter(index));
    }
    if progress.on_final_question() {
        println!("(last question: press s to submit)");
    }
}

fn print_submission(submission: &Submission) {
    let score = &submission.score;
    println!();
    println!("Assessment: {}", submission.topic.describe());
    println!(
        "Score: {}/{} ({}%) - {}",
        score.correct_count, score.total_questions, score.percentage, submission.grade
    );
    if submission.is_incomplete() {
        println!("{} question(s) were left unanswered.", score.unanswered_count());
    }
    println!();
    for entry in &submission.review {
        let verdict = match (entry.is_answered(), entry.is_correct) {
            (false, _) => "unanswered",
            (true, true) => "correct",
            (true, false) => "incorrect",
        };
        println!("{}. {} [{verdict}]", entry.position + 1, entry.question.text());
        if let Some(chosen) = entry.chosen_text() {
            println!("   your answer: {chosen}");
        }
        println!("   correct answer: {}", entry.correct_text());
    }
}

async fn drive(
    service: &AssessmentLoopService,
    mut session: AssessmentSession,
) -> Result<Option<Submission>, Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    print_question(&session);
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            return Ok(None);
        };

        match parse_input(&line) {
            Input::Answer(option) => {
                session.answer_current(option)?;
                print_question(&session);
            }
            Input::Next => match service.advance(&mut session).await {
                Ok(AdvanceOutcome::AtCapacity) => {
                    println!("No more questions. Press s to submit.");
                }
                Ok(_) => print_question(&session),
                Err(SessionError::Generation(err)) => {
                    eprintln!("could not load the next question: {err}");
                    eprintln!("press n to try again");
                }
                Err(err) => return Err(err.into()),
            },
            Input::Previous => {
                session.go_back();
                print_question(&session);
            }
            Input::Submit => return Ok(Some(service.submit(session)?)),
            Input::Quit => return Ok(None),
            Input::Unknown => {
                eprintln!("commands: a-d answer, n next, p previous, s submit, q quit");
            }
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let mut settings = AssessmentSettings::standard();
    if let Some(max_length) = args.max_length {
        settings = settings.with_max_length(max_length)?;
    }
    let offline = args.offline;
    let topic = args.into_topic(std::env::var("ASSESS_TOPIC").ok())?;

    let generator: Arc<dyn QuestionGenerator> = if offline {
        log::info!("offline mode: using placeholder questions");
        Arc::new(ScriptedGenerator::new())
    } else {
        let chat = ChatQuestionGenerator::from_env()?;
        if !chat.enabled() {
            log::warn!("ASSESS_AI_API_KEY is not set; pass --offline for placeholder questions");
        }
        Arc::new(chat)
    };

    let service = AssessmentLoopService::new(Clock::system(), generator).with_settings(settings);
    println!(
        "Preparing {} questions on {}...",
        service.settings().initial_batch_size(),
        topic.describe()
    );
    let session = service.start_session(topic).await?;

    if let Some(submission) = drive(&service, session).await? {
        print_submission(&submission);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
