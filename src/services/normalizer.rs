// src/services/normalizer.rs
//
// Normalização dos textos que chegam das planilhas: turma, curso, slugs,
// dia da semana e horário.
use regex::Regex;
use std::sync::LazyLock;

// Turma entre parênteses, ex: "1º INFOR_M(1.18.1I) sala-03"
static CLASS_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+\.\d+\.\d+[A-Za-z])\)").expect("regex de turma"));

// \w e \s do crate regex já são Unicode
static SLUG_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("regex de slug"));
static SLUG_SEPARATORS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("regex de separadores"));

// "07h30-8h20" (depois de tirar "min" e espaços)
static SLOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})h(\d{2})-(\d{1,2})h(\d{2})$").expect("regex de horário")
});

/// Código do curso (segundo segmento da turma) -> nome do curso.
const COURSES: &[(&str, &str)] = &[("18", "Informática"), ("28", "Meio Ambiente")];

pub const SLUG_FALLBACK: &str = "unknown";

/// Extrai a turma "limpa" (ex: `1.18.1I`) do texto bruto. Só conta o primeiro match.
pub fn extract_class_code(raw: &str) -> Option<String> {
    CLASS_CODE_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_uppercase())
}

/// x.18.y = Informática | x.28.y = Meio Ambiente. Qualquer outro valor não tem curso.
pub fn course_from_class_code(class_code: &str) -> Option<&'static str> {
    let mut parts = class_code.split('.');
    let _first = parts.next()?;
    let second = parts.next()?;

    COURSES
        .iter()
        .find(|(code, _)| *code == second)
        .map(|(_, name)| *name)
}

/// Slug minúsculo com hífens. Nunca falha e nunca devolve texto vazio.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let stripped = SLUG_STRIP_RE.replace_all(&lowered, "");
    let joined = SLUG_SEPARATORS_RE.replace_all(&stripped, "-");
    let slug = joined.trim_matches('-');

    if slug.is_empty() {
        SLUG_FALLBACK.to_string()
    } else {
        slug.to_string()
    }
}

/// Dia da semana em português -> 0..=6 (0 = segunda).
///
/// Aceita as variações que aparecem nas exportações: "Segunda", "terça-feira",
/// "Sexta feira", "SÁB", "dom".
pub fn parse_weekday(raw: &str) -> Option<u8> {
    let folded = fold_accents(&raw.trim().to_lowercase());
    let compact = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    let base = compact
        .strip_suffix("-feira")
        .or_else(|| compact.strip_suffix(" feira"))
        .unwrap_or(&compact)
        .trim_end_matches(['-', ' ']);

    match base {
        "segunda" | "seg" => Some(0),
        "terca" | "ter" => Some(1),
        "quarta" | "qua" => Some(2),
        "quinta" | "qui" => Some(3),
        "sexta" | "sex" => Some(4),
        "sabado" | "sab" => Some(5),
        "domingo" | "dom" => Some(6),
        _ => None,
    }
}

/// "07h30-8h20min" -> "07:30-08:20". Outros formatos passam só com trim.
pub fn normalize_slot(raw: &str) -> String {
    let compact: String = raw
        .trim()
        .to_lowercase()
        .replace("min", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    match SLOT_RE.captures(&compact) {
        Some(caps) => {
            let num = |i: usize| -> u32 {
                caps.get(i)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(0)
            };
            format!("{:02}:{:02}-{:02}:{:02}", num(1), num(2), num(3), num(4))
        }
        None => raw.trim().to_string(),
    }
}

fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}
