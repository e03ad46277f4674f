//! Prompt text sent to the oracle.
//!
//! Items are always enumerated from 1 in batch order; the group parser and the
//! relevance line parser both read those numbers back.

use std::fmt::Write;

pub const DEDUP_SYSTEM_PROMPT: &str = "너는 뉴스 헤드라인 중 중복된 내용을 그룹으로 묶어주는 AI야.";

const DEDUP_INSTRUCTION: &str = "다음은 뉴스 헤드라인 리스트야. 같은 사건이나 내용은 하나의 그룹으로 묶고, 그룹마다 기사 번호 리스트로 알려줘.";

const DEDUP_FORMAT: &str = "출력은 다음 형식으로만 해줘: [[1, 2], [3], [4, 5]]";

pub const CLASSIFY_SYSTEM_PROMPT: &str = "당신은 대기업 인사팀의 인사 담당자입니다.
다음 뉴스 기사 제목들을 검토하고 각 제목에 대해 다음 다섯 가지 항목에 대해 각각 'O' 또는 'X'로 판단하세요.

1. 이 기사가 삼성그룹 혹은 대기업과 관련이 있는가?
2. 이 기사가 HR 부서(채용, 인사, 제도, 임금, 교육, 노무 등)에서 관심을 가질만한 내용인가?
3. 정책/법안 등의 제도 변화와 관련된 내용인가?
4. 경제/산업계와 관련 내용인가?
5. 보험/금융업계 관련 내용인가?

각 기사에 대해 아래 형식으로 한 줄씩 출력하세요:
1. 대기업 관련: O, HR 관심: O, 정책/법안/판례 관련: X, 경제/산업 관련: O, 보험/금융 관련: X
...";

/// User message for one dedup batch.
pub fn dedup_user_prompt<'a>(headlines: impl IntoIterator<Item = &'a str>) -> String {
    let mut prompt = format!("{DEDUP_INSTRUCTION}\n\n");
    push_enumerated(&mut prompt, headlines);
    let _ = write!(prompt, "\n{DEDUP_FORMAT}");
    prompt
}

/// User message for one classification batch.
pub fn classify_user_prompt<'a>(headlines: impl IntoIterator<Item = &'a str>) -> String {
    let mut prompt = String::from("기사 목록:\n");
    push_enumerated(&mut prompt, headlines);
    prompt
}

fn push_enumerated<'a>(prompt: &mut String, items: impl IntoIterator<Item = &'a str>) {
    for (i, item) in items.into_iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", i + 1, item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_prompt_enumerates_from_one() {
        let prompt = dedup_user_prompt(["첫째", "둘째"]);
        assert!(prompt.contains("\n1. 첫째\n2. 둘째\n"));
        assert!(prompt.ends_with("[[1, 2], [3], [4, 5]]"));
    }

    #[test]
    fn test_classify_prompt_lists_headlines() {
        let prompt = classify_user_prompt(["A기업 조직개편 발표"]);
        assert_eq!(prompt, "기사 목록:\n1. A기업 조직개편 발표\n");
    }

    #[test]
    fn test_classify_system_prompt_shows_line_format() {
        assert!(CLASSIFY_SYSTEM_PROMPT.contains("보험/금융 관련: X"));
    }
}
