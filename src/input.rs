//! Line-oriented student input
//!
//! Slash commands stand in for the buttons and file picker of a graphical
//! chat; any other line is a chat message.

use crate::state_machine::{Event, Subject};
use std::path::PathBuf;

pub const HELP: &str = "\
פקודות:
  /math, /english, /geometry   בחירת נושא (או /subject <name>)
  /image <path>                שליחת תמונה של דף עבודה
  /yes, /no                    אישור או דחייה של תרגיל שזוהה
  /final <answer>              שליחת תשובה סופית לבדיקה
  /reset                       התחלה מחדש
  /help                        העזרה הזאת
  /quit                        יציאה
כל שורה אחרת נשלחת למורה כהודעה.";

/// What a line of input asks for
#[derive(Debug, Clone)]
pub enum InputCommand {
    /// Forward to the conversation
    Dispatch(Event),
    /// Start the conversation over
    Reset,
    Help,
    Quit,
    /// Malformed command; show this usage line
    Usage(&'static str),
}

pub fn parse_input(line: &str) -> InputCommand {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return InputCommand::Dispatch(Event::StudentMessage {
            text: line.to_string(),
        });
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name.to_lowercase().as_str() {
        "math" | "english" | "geometry" => subject_command(name),
        "subject" => {
            if arg.is_empty() {
                return InputCommand::Usage("/subject <math|english|geometry>");
            }
            subject_command(arg)
        }
        "image" => {
            if arg.is_empty() {
                return InputCommand::Usage("/image <path>");
            }
            InputCommand::Dispatch(Event::ImageSelected {
                path: PathBuf::from(arg),
            })
        }
        "yes" | "accept" => InputCommand::Dispatch(Event::AcceptExercise),
        "no" | "reject" => InputCommand::Dispatch(Event::RejectExercise),
        "final" | "answer" => {
            if arg.is_empty() {
                return InputCommand::Usage("/final <answer>");
            }
            InputCommand::Dispatch(Event::FinalAnswer {
                text: arg.to_string(),
            })
        }
        "reset" => InputCommand::Reset,
        "help" => InputCommand::Help,
        "quit" | "exit" => InputCommand::Quit,
        _ => InputCommand::Usage("/help לרשימת הפקודות"),
    }
}

fn subject_command(name: &str) -> InputCommand {
    match Subject::parse(name) {
        Some(subject) => InputCommand::Dispatch(Event::SubjectSelected { subject }),
        None => InputCommand::Usage("/subject <math|english|geometry>"),
    }
}
