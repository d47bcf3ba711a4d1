use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Client-side mirror of a remote thought-chat conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub first_name: Option<String>,
    pub current_question: String,
    pub answers: Vec<QaPair>,
    pub question_count: usize,
}

impl Session {
    pub fn new(session_id: String, first_name: Option<String>, first_question: String) -> Self {
        Self {
            session_id,
            first_name,
            current_question: first_question,
            answers: Vec::new(),
            question_count: 1,
        }
    }

    /// True when the last answer was sent but the server has not moved on yet.
    pub fn has_unconfirmed_answer(&self) -> bool {
        self.answers.len() >= self.question_count
    }

    /// Records an answer to the current question. A previous unconfirmed
    /// answer to the same question is replaced rather than duplicated.
    pub fn record_answer(&mut self, answer: String) {
        let pair = QaPair {
            question: self.current_question.clone(),
            answer,
        };
        if self.has_unconfirmed_answer() {
            if let Some(last) = self.answers.last_mut() {
                *last = pair;
                return;
            }
        }
        self.answers.push(pair);
    }

    pub fn advance(&mut self, next_question: String) {
        self.current_question = next_question;
        self.question_count += 1;
    }

    /// The answer already typed for the current question, if any.
    pub fn pending_answer(&self) -> Option<&str> {
        if self.has_unconfirmed_answer() {
            self.answers.last().map(|p| p.answer.as_str())
        } else {
            None
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        Snapshot {
            session_id: self.session_id.clone(),
            first_name: self.first_name.clone(),
            current_question: self.current_question.clone(),
            answers: self.answers.clone(),
            question_count: self.question_count,
            saved_at: now,
        }
    }
}

/// What gets written to local storage after every state-advancing step.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    pub current_question: String,
    pub answers: Vec<QaPair>,
    pub question_count: usize,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.saved_at) <= ttl
    }

    pub fn into_session(self) -> Session {
        Session {
            session_id: self.session_id,
            first_name: self.first_name,
            current_question: self.current_question,
            answers: self.answers,
            question_count: self.question_count,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
