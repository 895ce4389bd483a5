//! Tutor-side texts produced by the conversation itself

use super::state::Subject;

pub const GREETING: &str = "היי! אני המורה הפרטית שלך. במה נתרגל היום? בחרי נושא: /math, /english או /geometry";

pub const CHOOSE_SUBJECT_FIRST: &str = "קודם בחרי נושא: /math, /english או /geometry";

pub const THINKING: &str = "חושבת...";

pub const EMPTY_MESSAGE: &str = "לא ראיתי טקסט. כתבי לי תרגיל או שאלה 🙂";

pub const EMPTY_ANSWER: &str = "כתבי את התשובה הסופית שלך אחרי /final";

pub const REJECTED_DETECTED: &str = "אין בעיה. כתבי לי את התרגיל בעצמך.";

pub const SET_COMPLETE: &str = "סיימנו את כל התרגילים מהדף! כל הכבוד 🎉 אפשר לכתוב תרגיל חדש או לשלוח תמונה נוספת.";

pub const NO_EXERCISES_FOUND: &str = "לא מצאתי תרגילים בתמונה. נסי תמונה ברורה יותר או כתבי את התרגיל בעצמך.";

pub const CONNECTION_ERROR: &str = "משהו השתבש בחיבור למורה. נסי שוב בעוד רגע.";

pub const IMAGE_READ_ERROR: &str = "לא הצלחתי לפתוח את הקובץ. בדקי את הנתיב ונסי שוב.";

pub const OFF_TOPIC: &str =
    "אני עוזר רק בלמידה ותרגול של אנגלית ומתמטיקה. בואי נבחר יחד תרגיל או שאלה בתחום הזה 🙂";

pub const START_FAILED: &str = "לא הצלחתי להתחיל את התרגיל. נסי לכתוב אותו שוב.";

pub const NO_EXERCISE_FOR_ANSWER: &str = "עוד לא התחלנו תרגיל. כתבי לי תרגיל קודם 🙂";

pub const PROCESSING_IMAGE: &str = "רגע, אני מסתכלת על התמונה...";

pub const HINT_FALLBACK: &str = "בואי נתחיל. מה הצעד הראשון לדעתך?";

pub fn subject_chosen(subject: Subject) -> String {
    format!("בחרנו {}. כתבי לי תרגיל או שלחי תמונה של דף עבודה (/image <path>).", subject.display_name())
}

/// Shown with the first exercise of a freshly detected set
pub fn exercises_detected(count: usize, first: &str) -> String {
    if count == 1 {
        format!("זיהיתי תרגיל בתמונה:\n{first}\nזה התרגיל שאת רוצה לפתור?")
    } else {
        format!("זיהיתי {count} תרגילים בתמונה. נתחיל בראשון:\n{first}\nזה התרגיל שאת רוצה לפתור?")
    }
}

/// Shown when the set moves on after a finished exercise
pub fn next_in_set(position: usize, total: usize, exercise: &str) -> String {
    format!("תרגיל {position} מתוך {total}:\n{exercise}\nנמשיך איתו?")
}

/// Next open task of a worksheet, answered in free text
pub fn next_task(position: usize, total: usize, task: &str) -> String {
    format!("משימה {position} מתוך {total}:\n{task}\nכתבי לי איך היית עונה.")
}

/// English worksheets: summary plus the first task, answered as free text
pub fn english_tasks(summary: Option<&str>, first: &str) -> String {
    match summary.map(str::trim).filter(|s| !s.is_empty()) {
        Some(summary) => format!("{summary}\nנתחיל במשימה הראשונה:\n{first}\nכתבי לי איך היית עונה."),
        None => format!("נתחיל במשימה הראשונה:\n{first}\nכתבי לי איך היית עונה."),
    }
}
