//! Prompt templates for the model-backed callables
//!
//! User-turn templates are minijinja sources rendered with named slots.
//! Every grader asks for a bare yes/no so the verdict parser can enforce the
//! binary schema.

pub const RELEVANCE_SYSTEM: &str = "You are a grader assessing the relevance of a retrieved \
document to a user question. This is not a stringent test; the goal is to filter out erroneous \
retrievals. If the document contains keywords or semantic meaning related to the question, grade \
it as relevant. Answer with a single word, 'yes' or 'no', and nothing else.";

pub const RELEVANCE_USER: &str =
    "Retrieved document:\n\n{{ document }}\n\nUser question: {{ question }}";

pub const GROUNDEDNESS_SYSTEM: &str = "You are a grader assessing whether an answer is grounded \
in and supported by a set of retrieved facts. Answer with a single word, 'yes' or 'no', and \
nothing else. 'yes' means every claim in the answer is supported by the facts.";

pub const GROUNDEDNESS_USER: &str =
    "Set of facts:\n\n{{ facts }}\n\nAnswer:\n\n{{ generation }}";

pub const ADEQUACY_SYSTEM: &str = "You are a grader assessing whether an answer addresses and \
resolves a question. Answer with a single word, 'yes' or 'no', and nothing else. 'yes' means the \
answer resolves the question.";

pub const ADEQUACY_USER: &str =
    "User question:\n\n{{ question }}\n\nAnswer:\n\n{{ generation }}";

pub const REWRITE_SYSTEM: &str = "You are a question re-writer that converts an input question \
into a better version optimized for vector store retrieval. Reason about the underlying semantic \
intent of the question. Reply with the improved question only.";

pub const REWRITE_USER: &str =
    "Here is the initial question:\n\n{{ question }}\n\nFormulate an improved question.";

pub const GENERATE_SYSTEM: &str = "You are an assistant for question-answering tasks. Use the \
retrieved context below to answer the question. If the context does not contain the answer, say \
that you don't know; do not invent facts. Keep the answer concise, three sentences at most, in \
markdown with headings and bullet points where they help.";

pub const GENERATE_USER: &str =
    "Question: {{ question }}\nContext: {{ context }}\nAnswer:";
