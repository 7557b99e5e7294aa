//! Canned text used when the generative service gives us nothing usable.
//!
//! Every summary here must already be in the hedged register the tone
//! sanitizer enforces, and every action carries a number.

use serde::{Deserialize, Serialize};

/// Language of the canned text bank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ko => "ko",
            Locale::En => "en",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "ko" | "ko-kr" | "korean" => Some(Locale::Ko),
            "en" | "en-us" | "en-gb" | "english" => Some(Locale::En),
            _ => None,
        }
    }
}

/// Product surface the request came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Counsel,
    #[serde(alias = "my_body", alias = "my-body")]
    MyBody,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Counsel => "counsel",
            Mode::MyBody => "mybody",
        }
    }

    /// Unknown modes fall back to counsel.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "mybody" | "my_body" | "my-body" => Mode::MyBody,
            _ => Mode::Counsel,
        }
    }
}

/// A coherent set of narrative fields that are emitted together.
#[derive(Debug, Clone, Copy)]
pub struct Bundle {
    pub summary: &'static str,
    pub action: &'static str,
    pub next_question: &'static str,
}

/// Locale- and mode-specific canned text.
#[derive(Debug, Clone, Copy)]
pub struct TextBank {
    /// Replaces a summary that is empty after tone sanitizing.
    pub neutral_summary: &'static str,
    pub default_action: &'static str,
    pub default_question: &'static str,
    pub no_red_flag: &'static str,
    /// Emitted when nothing structured could be extracted.
    pub canned: Bundle,
    /// Emitted when too many required fields are missing.
    pub holistic: Bundle,
}

const KO_COUNSEL: TextBank = TextBank {
    neutral_summary: "지금 정보만으로는 단정하기 어려워 가능성 위주로 정리했어요.",
    default_action: "지금 상태를 1문장으로 적어줘.",
    default_question: "지금 가장 불편한 점 1가지를 알려줄래?",
    no_red_flag: "뚜렷한 위험신호 없음",
    canned: Bundle {
        summary: "정보가 부족해 우선 핵심만 정리할게.",
        action: "현재 증상이나 목표를 1문장으로 적어줘.",
        next_question: "지금 가장 불편한 증상이나 목표를 한 문장으로 말해줄래?",
    },
    holistic: Bundle {
        summary: "정보가 부족해 우선 정리할게.",
        action: "지금 상태를 1문장으로 적어줘.",
        next_question: "가장 불편한 증상이나 목표가 뭐야?",
    },
};

const KO_MY_BODY: TextBank = TextBank {
    neutral_summary: "지금 기록만으로는 단정하기 어려워 가능성 위주로 정리했어요.",
    default_action: "오늘 수면 시간을 1줄로 기록해줘.",
    default_question: "요즘 가장 신경 쓰이는 몸의 변화 1가지가 뭐야?",
    no_red_flag: "뚜렷한 위험신호 없음",
    canned: Bundle {
        summary: "몸 기록이 부족해 우선 핵심만 정리할게.",
        action: "오늘 수면 시간, 식사 횟수, 활동량 중 1가지를 기록해줘.",
        next_question: "요즘 가장 신경 쓰이는 몸의 변화가 뭐야?",
    },
    holistic: Bundle {
        summary: "몸 기록이 부족해 우선 정리할게.",
        action: "오늘 수면 시간을 1줄로 기록해줘.",
        next_question: "가장 신경 쓰이는 몸의 변화가 뭐야?",
    },
};

const EN_COUNSEL: TextBank = TextBank {
    neutral_summary: "It may be too early to tell from what we have so far.",
    default_action: "Write down your main concern in 1 sentence.",
    default_question: "What single symptom or goal bothers you most right now?",
    no_red_flag: "no red flag identified",
    canned: Bundle {
        summary: "There may not be enough information yet, so let's cover the basics.",
        action: "Describe your current symptom or goal in 1 sentence.",
        next_question: "What symptom or goal would you most like help with right now?",
    },
    holistic: Bundle {
        summary: "Much of the picture may still be missing, so let's start small.",
        action: "Take 2 minutes to note how you feel right now.",
        next_question: "What bothers you most at the moment?",
    },
};

const EN_MY_BODY: TextBank = TextBank {
    neutral_summary: "It may be too early to tell from your records so far.",
    default_action: "Log last night's sleep hours in 1 line.",
    default_question: "Which body change concerns you most lately?",
    no_red_flag: "no red flag identified",
    canned: Bundle {
        summary: "Your body records may be too sparse yet, so let's cover the basics.",
        action: "Log 1 of today's sleep hours, meal count, or step count.",
        next_question: "Which change in your body concerns you most lately?",
    },
    holistic: Bundle {
        summary: "Your records may still be thin, so let's start small.",
        action: "Log last night's sleep hours in 1 line.",
        next_question: "Which body change concerns you most?",
    },
};

impl TextBank {
    pub fn get(locale: Locale, mode: Mode) -> &'static TextBank {
        match (locale, mode) {
            (Locale::Ko, Mode::Counsel) => &KO_COUNSEL,
            (Locale::Ko, Mode::MyBody) => &KO_MY_BODY,
            (Locale::En, Mode::Counsel) => &EN_COUNSEL,
            (Locale::En, Mode::MyBody) => &EN_MY_BODY,
        }
    }
}
