use std::sync::Arc;
use std::time::Duration;

use leptess::LepTess;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::OcrConfig;
use crate::detection::RawDetection;
use crate::error::{ReadlensError, Result};

/// Map a request language code onto a Tesseract traineddata code.
///
/// Requests use two-letter ISO 639-1 codes (`"en"`, `"de"`); Tesseract
/// names its traineddata files with ISO 639-2 codes (`"eng"`, `"deu"`).
/// Three-letter codes and the `chi_*` script variants pass through.
fn tesseract_lang(code: &str) -> Result<String> {
    let code = code.trim().to_lowercase();
    let mapped = match code.as_str() {
        "en" => Some("eng"),
        "de" => Some("deu"),
        "fr" => Some("fra"),
        "es" => Some("spa"),
        "it" => Some("ita"),
        "pt" => Some("por"),
        "nl" => Some("nld"),
        "pl" => Some("pol"),
        "cs" => Some("ces"),
        "da" => Some("dan"),
        "fi" => Some("fin"),
        "sv" => Some("swe"),
        "no" => Some("nor"),
        "hu" => Some("hun"),
        "tr" => Some("tur"),
        "el" => Some("ell"),
        "ru" => Some("rus"),
        "uk" => Some("ukr"),
        "ar" => Some("ara"),
        "he" => Some("heb"),
        "hi" => Some("hin"),
        "th" => Some("tha"),
        "vi" => Some("vie"),
        "ja" => Some("jpn"),
        "ko" => Some("kor"),
        "zh" => Some("chi_sim"),
        _ => None,
    };
    if let Some(mapped) = mapped {
        return Ok(mapped.to_string());
    }
    if code.len() == 3 || code.starts_with("chi_") {
        return Ok(code);
    }
    Err(ReadlensError::Engine(format!(
        "unsupported language code: {code}"
    )))
}

/// Build the `+`-joined language spec Tesseract expects, deduplicated and
/// in request order.
pub fn lang_spec(languages: &[String]) -> Result<String> {
    let mut codes: Vec<String> = Vec::new();
    for language in languages {
        let code = tesseract_lang(language)?;
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    Ok(codes.join("+"))
}

/// One initialized Tesseract instance for a fixed language set.
///
/// Recognition is CPU-bound and the underlying API is not thread-safe, so
/// calls are serialized through a mutex and run on the blocking pool.
pub struct TesseractEngine {
    api: Arc<Mutex<LepTess>>,
    timeout_secs: u64,
}

impl TesseractEngine {
    pub fn new(languages: &[String], config: &OcrConfig) -> Result<Self> {
        let spec = lang_spec(languages)?;
        let api = LepTess::new(config.data_path.as_deref(), &spec).map_err(|e| {
            ReadlensError::Engine(format!("failed to initialize Tesseract for '{spec}': {e}"))
        })?;

        info!(languages = %spec, "Tesseract engine initialized");

        Ok(Self {
            api: Arc::new(Mutex::new(api)),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Run OCR over normalized image bytes and return the raw detections.
    pub async fn readtext(&self, image_bytes: &[u8]) -> Result<Vec<RawDetection>> {
        let timeout = Duration::from_secs(self.timeout_secs);

        match tokio::time::timeout(timeout, self.readtext_inner(image_bytes)).await {
            Ok(result) => result,
            Err(_) => Err(ReadlensError::Engine(format!(
                "OCR timed out after {} seconds",
                self.timeout_secs
            ))),
        }
    }

    async fn readtext_inner(&self, image_bytes: &[u8]) -> Result<Vec<RawDetection>> {
        let bytes = image_bytes.to_vec();
        let api = Arc::clone(&self.api);

        let tsv = tokio::task::spawn_blocking(move || {
            let mut lt = api.blocking_lock();
            lt.set_image_from_mem(&bytes)
                .map_err(|e| ReadlensError::Engine(format!("failed to set image: {e}")))?;
            lt.get_tsv_text(0)
                .map_err(|e| ReadlensError::Engine(format!("failed to recognize text: {e}")))
        })
        .await
        .map_err(|e| ReadlensError::Engine(format!("OCR task panicked: {e}")))??;

        Ok(parse_tsv(&tsv))
    }
}

impl Clone for TesseractEngine {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// One word row from Tesseract's TSV output (level 5).
#[derive(Debug)]
struct TsvWord {
    /// (page, block, paragraph, line) — identifies the line a word belongs to.
    line: (u32, u32, u32, u32),
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    conf: f32,
    text: String,
}

fn parse_tsv_word(row: &str) -> Option<TsvWord> {
    let cols: Vec<&str> = row.split('\t').collect();
    if cols.len() < 12 || cols[0] != "5" {
        return None;
    }

    // Tesseract reports -1 for rows it did not actually recognize.
    let conf: f32 = cols[10].parse().ok()?;
    if conf < 0.0 {
        return None;
    }

    let text = cols[11].trim();
    if text.is_empty() {
        return None;
    }

    Some(TsvWord {
        line: (
            cols[1].parse().ok()?,
            cols[2].parse().ok()?,
            cols[3].parse().ok()?,
            cols[4].parse().ok()?,
        ),
        left: cols[6].parse().ok()?,
        top: cols[7].parse().ok()?,
        width: cols[8].parse().ok()?,
        height: cols[9].parse().ok()?,
        conf,
        text: text.to_string(),
    })
}

/// Parse TSV output into line-level detections.
///
/// Words sharing a (page, block, paragraph, line) id are merged into one
/// detection: texts joined with spaces, confidence averaged and scaled from
/// Tesseract's 0-100 range into [0, 1], and the polygon set to the corners
/// of the union of the word rectangles.
pub fn parse_tsv(tsv: &str) -> Vec<RawDetection> {
    let mut detections = Vec::new();
    let mut current: Vec<TsvWord> = Vec::new();

    for word in tsv.lines().filter_map(parse_tsv_word) {
        if let Some(last) = current.last() {
            if last.line != word.line {
                detections.push(line_detection(&current));
                current.clear();
            }
        }
        current.push(word);
    }
    if !current.is_empty() {
        detections.push(line_detection(&current));
    }

    detections
}

fn line_detection(words: &[TsvWord]) -> RawDetection {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for word in words {
        min_x = min_x.min(word.left);
        min_y = min_y.min(word.top);
        max_x = max_x.max(word.left + word.width);
        max_y = max_y.max(word.top + word.height);
    }

    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let confidence = words.iter().map(|w| w.conf).sum::<f32>() / words.len() as f32 / 100.0;

    RawDetection {
        polygon: [
            [min_x, min_y],
            [max_x, min_y],
            [max_x, max_y],
            [min_x, max_y],
        ],
        text,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_common_iso_639_1_codes() {
        assert_eq!(tesseract_lang("en").unwrap(), "eng");
        assert_eq!(tesseract_lang("de").unwrap(), "deu");
        assert_eq!(tesseract_lang("ja").unwrap(), "jpn");
        assert_eq!(tesseract_lang("zh").unwrap(), "chi_sim");
    }

    #[test]
    fn three_letter_codes_pass_through_lowercased() {
        assert_eq!(tesseract_lang("ENG").unwrap(), "eng");
        assert_eq!(tesseract_lang("deu").unwrap(), "deu");
        assert_eq!(tesseract_lang("chi_tra").unwrap(), "chi_tra");
    }

    #[test]
    fn unknown_code_is_an_engine_error() {
        let err = tesseract_lang("xx").unwrap_err();
        assert!(matches!(err, ReadlensError::Engine(_)));
    }

    #[test]
    fn lang_spec_joins_and_deduplicates() {
        let languages = vec!["en".to_string(), "de".to_string(), "EN".to_string()];
        assert_eq!(lang_spec(&languages).unwrap(), "eng+deu");
    }

    const SAMPLE_TSV: &str = "\
level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t
4\t1\t1\t1\t1\t0\t10\t10\t110\t20\t-1\t
5\t1\t1\t1\t1\t1\t10\t10\t50\t20\t96\tHello
5\t1\t1\t1\t1\t2\t70\t10\t50\t20\t90\tworld
5\t1\t1\t1\t2\t1\t10\t50\t30\t15\t80\tbye
5\t1\t1\t1\t2\t2\t50\t50\t10\t15\t-1\t
5\t1\t1\t1\t3\t1\t10\t80\t30\t15\t70\t   ";

    #[test]
    fn words_group_into_line_detections() {
        let detections = parse_tsv(SAMPLE_TSV);
        assert_eq!(detections.len(), 2);

        assert_eq!(detections[0].text, "Hello world");
        assert!((detections[0].confidence - 0.93).abs() < 1e-4);
        assert_eq!(
            detections[0].polygon,
            [
                [10.0, 10.0],
                [120.0, 10.0],
                [120.0, 30.0],
                [10.0, 30.0],
            ]
        );

        assert_eq!(detections[1].text, "bye");
        assert!((detections[1].confidence - 0.8).abs() < 1e-4);
    }

    #[test]
    fn unrecognized_and_blank_words_are_dropped() {
        // conf=-1 rows and whitespace-only text never become detections
        let detections = parse_tsv(SAMPLE_TSV);
        assert!(detections.iter().all(|d| !d.text.trim().is_empty()));
        assert_eq!(detections.len(), 2);
    }

    #[test]
    fn empty_tsv_yields_no_detections() {
        assert!(parse_tsv("").is_empty());
        assert!(parse_tsv(
            "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext"
        )
        .is_empty());
    }

    #[test]
    fn short_rows_are_ignored() {
        assert!(parse_tsv("5\t1\t1\t1\t1\t1\t10\t10").is_empty());
    }

    #[test]
    fn confidence_is_scaled_to_unit_range() {
        let tsv = "5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t100\tsure";
        let detections = parse_tsv(tsv);
        assert_eq!(detections.len(), 1);
        assert!((detections[0].confidence - 1.0).abs() < 1e-6);
    }
}
