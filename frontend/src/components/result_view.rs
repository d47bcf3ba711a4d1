use yew::prelude::*;

use crate::wizard::api::GenerationResult;
use crate::wizard::ResultKind;

#[derive(Properties, PartialEq)]
pub struct ResultViewProps {
    pub result: GenerationResult,
    pub kind: ResultKind,
}

/// One card per run of non-blank lines.
pub fn split_cards(text: &str) -> Vec<String> {
    let mut cards = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            if !current.is_empty() {
                cards.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        cards.push(current.join("\n"));
    }
    cards
}

#[function_component(ResultView)]
pub fn result_view(props: &ResultViewProps) -> Html {
    let result = &props.result;
    let script = result.script.clone().unwrap_or_default();

    let media = match props.kind {
        ResultKind::Audio => match &result.audio_url {
            Some(url) => html! {
                <audio controls={true} src={url.clone()} style="width: 100%; margin: 1rem 0;"></audio>
            },
            None => html! {
                <p class="result-missing">{ "The audio is still on its way. The script is below." }</p>
            },
        },
        ResultKind::Image => match &result.image_url {
            Some(url) => html! {
                <img src={url.clone()} alt="Your vision board" style="width: 100%; border-radius: 12px; margin: 1rem 0;" />
            },
            None => html! {
                <p class="result-missing">{ "We couldn't load the image." }</p>
            },
        },
        ResultKind::Cards => html! {},
    };

    let body = match props.kind {
        ResultKind::Cards => html! {
            <div class="result-cards" style="display: grid; gap: 1rem;">
                { for split_cards(&script).into_iter().enumerate().map(|(i, card)| html! {
                    <div class="result-card" style="padding: 1rem; border-radius: 12px; background: rgba(0, 0, 0, 0.3);">
                        <small style="color: #7EB2FF;">{ format!("Card {}", i + 1) }</small>
                        <p style="white-space: pre-wrap;">{ card }</p>
                    </div>
                }) }
            </div>
        },
        _ if script.is_empty() => html! {},
        _ => html! {
            <p class="result-script" style="white-space: pre-wrap; line-height: 1.6;">{ script.clone() }</p>
        },
    };

    html! {
        <div class="result-view">
            { media }
            { body }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use yew::ServerRenderer;

    fn render(result: GenerationResult, kind: ResultKind) -> String {
        block_on(ServerRenderer::<ResultView>::with_props(move || ResultViewProps { result, kind }).render())
    }

    #[test]
    fn cards_split_on_blank_lines() {
        let cards = split_cards("Q: What is 2+2?\nA: 4\n\n\n  \n\nQ: Capital of France?\nA: Paris\n");
        assert_eq!(cards, vec!["Q: What is 2+2?\nA: 4", "Q: Capital of France?\nA: Paris"]);
    }

    #[test]
    fn cards_split_on_crlf_and_whitespace_lines() {
        assert_eq!(split_cards("A\r\n\r\nB"), vec!["A", "B"]);
        assert_eq!(split_cards("A\n  \nB\r\nC"), vec!["A", "B\nC"]);
        assert!(split_cards(" \n\t\n").is_empty());
    }

    #[test]
    fn santa_result_shows_script_and_audio_player() {
        let html = render(
            GenerationResult {
                script: Some("Ho ho ho...".into()),
                audio_url: Some("/outputs/abc.mp3".into()),
                image_url: None,
            },
            ResultKind::Audio,
        );
        assert!(html.contains("Ho ho ho..."));
        assert!(html.contains("<audio"));
        assert!(html.contains(r#"src="/outputs/abc.mp3""#));
        assert!(!html.contains("still on its way"));
    }

    #[test]
    fn audio_without_url_falls_back_to_script_only() {
        let html = render(
            GenerationResult { script: Some("Merry Christmas".into()), audio_url: None, image_url: None },
            ResultKind::Audio,
        );
        assert!(!html.contains("<audio"));
        assert!(html.contains("still on its way"));
        assert!(html.contains("Merry Christmas"));
    }

    #[test]
    fn image_without_url_and_empty_script_stay_neutral() {
        let html = render(
            GenerationResult { script: None, audio_url: Some("/a.mp3".into()), image_url: None },
            ResultKind::Image,
        );
        assert!(!html.contains("<img"));
        assert!(html.contains("load the image"));
        assert!(!html.contains("result-script"));
    }

    #[test]
    fn image_result_binds_the_url() {
        let html = render(
            GenerationResult { script: None, audio_url: None, image_url: Some("/outputs/board.png".into()) },
            ResultKind::Image,
        );
        assert!(html.contains(r#"src="/outputs/board.png""#));
    }

    #[test]
    fn cards_render_one_block_per_card() {
        let html = render(
            GenerationResult { script: Some("one\n\ntwo\n\nthree".into()), audio_url: None, image_url: None },
            ResultKind::Cards,
        );
        assert_eq!(html.matches("result-card\"").count(), 3);
        assert!(html.contains("Card 3"));

        let empty = render(GenerationResult::default(), ResultKind::Cards);
        assert!(!empty.contains("result-card\""));
    }
}
