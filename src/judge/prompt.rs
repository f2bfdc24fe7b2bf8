//! System prompt for the LLM judge.

use tracing::{debug, instrument};

use crate::game::Language;
use crate::judge::JudgeRequest;

const RULES: &str = r#"# Goal
The player must submit a word that "beats" the previous word under the rules below.
The game never ends, but every submitted word must be unique.

# A word beats the previous one through
- Logical interaction: it can demonstrably destroy, break, neutralise, supplant, corrupt or kill the previous word, physically, conceptually, emotionally, socially, relationally or naturally. The relation must be coherent and applicable.
- Functional superiority: it is more capable, advanced or effective at the previous word's main purpose.
- Human or social power: influence, power or emotion lets it prevail in a social, economic or relational context, only where that influence is relevant and logical.
- Conceptual transcendence: as an idea it transcends or cancels the previous one morally, philosophically or cognitively, only where that is logically defensible.
- Time and natural forces: time or nature inevitably wears down or destroys the previous word.
- Death: death transcends anything living or material, unless the new word is a direct answer to it (for example "immortality").

# A word fails to beat the previous one on
- Conceptual or functional inferiority: it is clearly less advanced, less effective or unsuited to act on the previous word.
- Context mismatch: it cannot heal, destroy, manipulate or surpass the previous word.
- Excessive abstraction: it is too vague or has no clear link to the previous word.
- Duplicate: the player already used it earlier in the game.

# Evaluation
Always judge the submitted word against the criteria above, paying attention to context that could reverse a normal logical relation.
Check the already used words for duplicates.
Pair every submitted word with a relevant descriptive emoji."#;

const FORMAT: &str = r#"# Reply format
Always reply with this JSON object only, whether the word wins or not:

{
 "explication_pour_ou_contre": "[under 15 words: why the word beats or does not beat the previous one]",
 "mot_precedent": "[previous word]",
 "mot_soumis_par_utilisateur": "[submitted word]",
 "smiley_correspondant_au_mot": "[emoji for the submitted word]",
 "mot_deja_utiliser_precedement": [true/false],
 "succes": [true/false]
}"#;

/// Directive fixing the language the judge answers in.
pub fn locale_directive(language: Language) -> &'static str {
    match language {
        Language::Fr => "LE JEU SE DEROULE EN FRANÇAIS, donc tu ne réponds qu'en FRANÇAIS.",
        Language::En => "THE GAME IS IN ENGLISH, so you only respond in ENGLISH.",
        Language::De => "DAS SPIEL IST AUF DEUTSCH, also antwortest du nur auf DEUTSCH.",
        Language::Es => "EL JUEGO ESTÁ EN ESPAÑOL, así que solo respondes en ESPAÑOL.",
        Language::It => "IL GIOCO È IN ITALIANO, quindi rispondi solo in ITALIANO.",
    }
}

/// Builds the system prompt for one ruling. The candidate word itself is
/// sent as the user message.
#[instrument(skip(request), fields(word = %request.word, language = %request.language))]
pub fn system_prompt(request: &JudgeRequest) -> String {
    let used = serde_json::to_string(&request.previous_words).unwrap_or_else(|_| "[]".to_string());
    let prompt = format!(
        "{directive}\n\n{RULES}\n\n# Current game\nPrevious word: [\"{current}\"]\nAlready used words: {used}\n\n{FORMAT}",
        directive = locale_directive(request.language),
        current = request.current_word,
    );
    debug!(prompt_length = prompt.len(), "Built judge prompt");
    prompt
}
