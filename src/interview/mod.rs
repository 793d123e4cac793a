//! The fixed interview: question sequence and answer handling.
//!
//! The interview is a fixed, totally ordered list of seven questions — no
//! branching, no skipping, no repetition. Each answer is folded into the
//! session's [`InterviewState`](accumulate::InterviewState) by the pure
//! [`apply`](accumulate::apply) function; the caller owns the authoritative
//! state between steps.

pub mod accumulate;
pub mod normalize;

use serde::{Deserialize, Serialize};

pub use accumulate::{Answer, ApplyOutcome, Constraints, InterviewState, apply, apply_raw};

/// Stable question identifiers.
///
/// Wire names are fixed; `Q6` (국내/해외/포맷) was retired from the product
/// and its id is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionId {
    /// 서사/감정 opener, free text.
    #[serde(rename = "Q1_SQUIN")]
    Squin,
    /// 분량, single choice.
    #[serde(rename = "Q2_LENGTH")]
    Length,
    /// 발간연도, multi choice.
    #[serde(rename = "Q3_RECENCY")]
    Recency,
    /// 맥락/매력 요소, multi choice.
    #[serde(rename = "Q4_CONTEXT")]
    Context,
    /// 장르, multi choice (options come from the category table).
    #[serde(rename = "Q5_GENRE")]
    Genre,
    /// 제외요소, free text.
    #[serde(rename = "Q7_NEG")]
    Negative,
    /// 핵심 키워드 closer, free text.
    #[serde(rename = "Q8_END")]
    Keywords,
}

impl QuestionId {
    /// Parse a wire id, returning `None` for ids outside the fixed set.
    pub fn from_wire(id: &str) -> Option<Self> {
        match id {
            "Q1_SQUIN" => Some(Self::Squin),
            "Q2_LENGTH" => Some(Self::Length),
            "Q3_RECENCY" => Some(Self::Recency),
            "Q4_CONTEXT" => Some(Self::Context),
            "Q5_GENRE" => Some(Self::Genre),
            "Q7_NEG" => Some(Self::Negative),
            "Q8_END" => Some(Self::Keywords),
            _ => None,
        }
    }

    /// The stable wire name.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Squin => "Q1_SQUIN",
            Self::Length => "Q2_LENGTH",
            Self::Recency => "Q3_RECENCY",
            Self::Context => "Q4_CONTEXT",
            Self::Genre => "Q5_GENRE",
            Self::Negative => "Q7_NEG",
            Self::Keywords => "Q8_END",
        }
    }
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    FreeText,
    SingleChoice,
    MultiChoice,
}

/// One immutable interview question.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub kind: QuestionKind,
    pub prompt: &'static str,
    /// Choice options in display order; empty for free-text questions and
    /// for the genre question, whose options are the category table's names.
    pub options: &'static [&'static str],
}

/// The fixed question sequence, in interview order.
pub const QUESTIONS: &[Question] = &[
    Question {
        id: QuestionId::Squin,
        kind: QuestionKind::FreeText,
        prompt: "최근 읽었던 책이나, 없다면 TV 프로그램, 유튜브 등 미디어에서 어떤 이야기(감정/분위기)가 마음에 남았나요?",
        options: &[],
    },
    Question {
        id: QuestionId::Length,
        kind: QuestionKind::SingleChoice,
        prompt: "분량은 어느 정도가 좋아요?",
        options: &["짧음(~200쪽)", "중간(~500쪽)", "장편(500쪽 이상)"],
    },
    Question {
        id: QuestionId::Recency,
        kind: QuestionKind::MultiChoice,
        prompt: "발간연도/신간 여부는 중요할까요?",
        options: &["비교적 최근(3년 이내)", "최신 선호(5년 이내)", "무관"],
    },
    Question {
        id: QuestionId::Context,
        kind: QuestionKind::MultiChoice,
        prompt: "책을 선택할 때 어떤 요소를 중요하게 여기나요? (복수 선택)",
        options: &[
            "속도감(내용의 진행 속도)",
            "성격 묘사(캐릭터가 서술되는 방식)",
            "설정(작품의 세계관)",
            "정보 전달성(유익한 정보 제공)",
            "문체(문장 구성)",
        ],
    },
    Question {
        id: QuestionId::Genre,
        kind: QuestionKind::MultiChoice,
        prompt: "장르 선호가 있나요? (복수 선택 가능)",
        options: &[],
    },
    Question {
        id: QuestionId::Negative,
        kind: QuestionKind::FreeText,
        prompt: "피하고 싶은 요소가 있나요? (예: 철학적 주제 제외, 잔혹 장면 X 등)",
        options: &[],
    },
    Question {
        id: QuestionId::Keywords,
        kind: QuestionKind::FreeText,
        prompt: "마지막으로 꼭 담겼으면 하는 키워드가 있을까요? (예: 위로, 일상, 따뜻함)",
        options: &[],
    },
];

/// Look up a question by id.
pub fn question(id: QuestionId) -> &'static Question {
    QUESTIONS
        .iter()
        .find(|q| q.id == id)
        .expect("every QuestionId appears in QUESTIONS")
}
