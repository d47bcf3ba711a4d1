use chrono::Utc;
use log::info;
use web_sys::{HtmlInputElement, HtmlTextAreaElement, KeyboardEvent};
use yew::prelude::*;

use crate::components::progress_dots::ProgressDots;
use crate::components::result_view::ResultView;
use crate::wizard::api::{Inbound, Outbound};
use crate::wizard::{dispatch, HttpSessionApi, LocalStorage, Phase, ProductConfig, WizardController};

#[derive(Properties, PartialEq)]
pub struct WizardPageProps {
    pub product: &'static ProductConfig,
    #[prop_or_default]
    pub token: Option<String>,
}

pub enum WizardMsg {
    Load,
    SetFirstName(String),
    SetAnswer(String),
    Start,
    Submit,
    Resume,
    StartFresh,
    ConfirmReview,
    Generate,
    Retry,
    DismissError,
    Restart,
    Response(Inbound),
}

pub struct WizardPage {
    controller: WizardController<LocalStorage>,
    first_name: String,
    answer: String,
}

impl WizardPage {
    fn send(ctx: &Context<Self>, outbound: Option<Outbound>) {
        if let Some(outbound) = outbound {
            ctx.link().send_future(async move {
                WizardMsg::Response(dispatch(&HttpSessionApi, outbound).await)
            });
        }
    }

    // Keeps the textarea in step with the current question.
    fn sync_answer(&mut self) {
        self.answer = self
            .controller
            .session()
            .and_then(|s| s.pending_answer())
            .unwrap_or_default()
            .to_string();
    }
}

impl Component for WizardPage {
    type Message = WizardMsg;
    type Properties = WizardPageProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(WizardMsg::Load);
        let props = ctx.props();
        Self {
            controller: WizardController::new(props.product, LocalStorage, props.token.clone()),
            first_name: String::new(),
            answer: String::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            WizardMsg::Load => {
                let outbound = self.controller.load(Utc::now());
                Self::send(ctx, outbound);
                true
            }
            WizardMsg::SetFirstName(name) => {
                self.first_name = name;
                true
            }
            WizardMsg::SetAnswer(answer) => {
                self.answer = answer;
                true
            }
            WizardMsg::Start => {
                let outbound = self.controller.start(&self.first_name);
                Self::send(ctx, outbound);
                true
            }
            WizardMsg::Submit => {
                let outbound = self.controller.submit_answer(&self.answer, Utc::now());
                Self::send(ctx, outbound);
                true
            }
            WizardMsg::Resume => {
                self.controller.resume();
                self.sync_answer();
                true
            }
            WizardMsg::StartFresh => {
                self.controller.start_fresh();
                true
            }
            WizardMsg::ConfirmReview => {
                let outbound = self.controller.confirm_review();
                Self::send(ctx, outbound);
                true
            }
            WizardMsg::Generate => {
                let outbound = self.controller.generate();
                Self::send(ctx, outbound);
                true
            }
            WizardMsg::Retry => {
                let outbound = self.controller.retry();
                Self::send(ctx, outbound);
                true
            }
            WizardMsg::DismissError => {
                self.controller.dismiss_error();
                true
            }
            WizardMsg::Restart => {
                info!("Restarting {} wizard", self.controller.product().slug);
                self.controller.restart();
                self.answer.clear();
                true
            }
            WizardMsg::Response(inbound) => {
                let follow_up = self.controller.apply(inbound, Utc::now());
                Self::send(ctx, follow_up);
                self.sync_answer();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let product = self.controller.product();
        html! {
            <div class="wizard-container">
                <style>
                {r#".wizard-container {
                    max-width: 640px;
                    margin: 6rem auto 2rem;
                    padding: 2.5rem;
                    background: rgba(30, 30, 30, 0.7);
                    border: 1px solid rgba(30, 144, 255, 0.1);
                    border-radius: 16px;
                    color: #fff;
                }
                .wizard-container h1 { text-align: center; margin-bottom: 0.5rem; }
                .wizard-tagline { text-align: center; color: rgba(255, 255, 255, 0.7); margin-bottom: 2rem; }
                .wizard-question { font-size: 1.25rem; margin: 1.5rem 0 1rem; }
                .wizard-container textarea, .wizard-container input {
                    width: 100%;
                    padding: 0.8rem;
                    border-radius: 8px;
                    border: 1px solid rgba(255, 255, 255, 0.2);
                    background: rgba(0, 0, 0, 0.3);
                    color: #fff;
                    box-sizing: border-box;
                }
                .wizard-actions { display: flex; gap: 1rem; justify-content: center; margin-top: 1.5rem; }
                .wizard-button {
                    padding: 0.8rem 1.6rem;
                    border: none;
                    border-radius: 8px;
                    background: #1E90FF;
                    color: #fff;
                    cursor: pointer;
                }
                .wizard-button.secondary { background: transparent; border: 1px solid rgba(255, 255, 255, 0.3); }
                .wizard-button:disabled { opacity: 0.5; cursor: not-allowed; }
                .error-message {
                    display: flex;
                    justify-content: space-between;
                    gap: 1rem;
                    padding: 0.8rem 1rem;
                    margin-bottom: 1rem;
                    border-radius: 8px;
                    background: rgba(255, 68, 68, 0.15);
                    color: #ff8080;
                }
                .error-message button { background: none; border: none; color: inherit; cursor: pointer; }
                .progress-dots { display: flex; gap: 0.5rem; justify-content: center; }
                .progress-dot { width: 12px; height: 12px; border-radius: 50%; background: rgba(255, 255, 255, 0.15); }
                .progress-dot.completed { background: #1E90FF; }
                .progress-dot.current { background: #7EB2FF; box-shadow: 0 0 8px #7EB2FF; }
                .loading-spinner {
                    display: inline-block;
                    width: 20px;
                    height: 20px;
                    border: 3px solid rgba(255,255,255,.3);
                    border-radius: 50%;
                    border-top-color: #fff;
                    animation: spin 1s ease-in-out infinite;
                }
                @keyframes spin { to { transform: rotate(360deg); } }
                @media (max-width: 768px) {
                    .wizard-container { padding: 1.5rem; margin: 5rem 1rem 1rem; }
                }"#}
                </style>
                <h1>{ product.title }</h1>
                <p class="wizard-tagline">{ product.tagline }</p>
                { self.view_error(ctx) }
                { self.view_phase(ctx) }
            </div>
        }
    }
}

impl WizardPage {
    fn view_error(&self, ctx: &Context<Self>) -> Html {
        let Some(notice) = self.controller.error() else {
            return html! {};
        };
        let busy = self.controller.is_busy();
        html! {
            <div class="error-message">
                <span>{ &notice.message }</span>
                <span>
                    if notice.retry.is_some() {
                        <button disabled={busy} onclick={ctx.link().callback(|_| WizardMsg::Retry)}>
                            { "Try again" }
                        </button>
                    }
                    <button onclick={ctx.link().callback(|_| WizardMsg::DismissError)}>
                        { "✕" }
                    </button>
                </span>
            </div>
        }
    }

    fn view_phase(&self, ctx: &Context<Self>) -> Html {
        let product = self.controller.product();
        let busy = self.controller.is_busy();
        let restart = ctx.link().callback(|_| WizardMsg::Restart);

        match self.controller.phase() {
            Phase::NotStarted => html! {
                <>
                    if product.asks_first_name {
                        <label>
                            { product.first_name_label }
                            <input
                                type="text"
                                value={self.first_name.clone()}
                                oninput={ctx.link().callback(|e: InputEvent| {
                                    let input: HtmlInputElement = e.target_unchecked_into();
                                    WizardMsg::SetFirstName(input.value())
                                })}
                            />
                        </label>
                    }
                    <div class="wizard-actions">
                        <button class="wizard-button" disabled={busy} onclick={ctx.link().callback(|_| WizardMsg::Start)}>
                            if busy {
                                <span class="loading-spinner"></span>
                            } else {
                                { product.start_label }
                            }
                        </button>
                    </div>
                </>
            },
            Phase::Checking(_) => html! {
                <div style="text-align: center;"><span class="loading-spinner"></span>{ " Checking your saved progress..." }</div>
            },
            Phase::ResumeOffer(snapshot) => html! {
                <>
                    <p style="text-align: center;">
                        { format!("You have an unfinished session with {} answer(s). Pick up where you left off?", snapshot.answers.len()) }
                    </p>
                    <div class="wizard-actions">
                        <button class="wizard-button" onclick={ctx.link().callback(|_| WizardMsg::Resume)}>{ "Resume" }</button>
                        <button class="wizard-button secondary" onclick={ctx.link().callback(|_| WizardMsg::StartFresh)}>{ "Start over" }</button>
                    </div>
                </>
            },
            Phase::InProgress => self.view_question(ctx),
            Phase::Review => {
                let answers = self.controller.session().map(|s| s.answers.clone()).unwrap_or_default();
                html! {
                    <>
                        <ProgressDots slots={self.controller.progress()} />
                        <h3>{ "Here's what you told us" }</h3>
                        <ul class="wizard-review">
                            { for answers.iter().map(|pair| html! {
                                <li>
                                    <strong>{ &pair.question }</strong>
                                    <p>{ &pair.answer }</p>
                                </li>
                            }) }
                        </ul>
                        <div class="wizard-actions">
                            <button class="wizard-button" disabled={busy} onclick={ctx.link().callback(|_| WizardMsg::ConfirmReview)}>
                                { "Looks good, create it" }
                            </button>
                            <button class="wizard-button secondary" disabled={busy} onclick={restart}>{ "Start over" }</button>
                        </div>
                    </>
                }
            }
            Phase::AwaitingGeneration => html! {
                <>
                    <ProgressDots slots={self.controller.progress()} />
                    if busy {
                        <div style="text-align: center; margin-top: 2rem;">
                            <span class="loading-spinner"></span>{ " " }{ product.generate_label }
                        </div>
                    } else {
                        <div class="wizard-actions">
                            <button class="wizard-button" onclick={ctx.link().callback(|_| WizardMsg::Generate)}>
                                { "Try again" }
                            </button>
                            <button class="wizard-button secondary" onclick={restart}>{ "Start over" }</button>
                        </div>
                    }
                </>
            },
            Phase::Generated(result) => html! {
                <>
                    <ResultView result={result.clone()} kind={product.result_kind} />
                    <div class="wizard-actions">
                        <button class="wizard-button" onclick={restart}>{ "Make another" }</button>
                    </div>
                </>
            },
        }
    }

    fn view_question(&self, ctx: &Context<Self>) -> Html {
        let busy = self.controller.is_busy();
        let question = self
            .controller
            .session()
            .map(|s| s.current_question.clone())
            .filter(|q| !q.trim().is_empty());
        let blank = self.answer.trim().is_empty();

        let onkeydown = ctx.link().batch_callback(|e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                Some(WizardMsg::Submit)
            } else {
                None
            }
        });

        html! {
            <>
                <ProgressDots slots={self.controller.progress()} />
                <p class="wizard-question">
                    { question.unwrap_or_else(|| "Tell us a little more...".to_string()) }
                </p>
                <textarea
                    rows="4"
                    disabled={busy}
                    value={self.answer.clone()}
                    oninput={ctx.link().callback(|e: InputEvent| {
                        let input: HtmlTextAreaElement = e.target_unchecked_into();
                        WizardMsg::SetAnswer(input.value())
                    })}
                    {onkeydown}
                />
                <div class="wizard-actions">
                    <button class="wizard-button secondary" disabled={busy} onclick={ctx.link().callback(|_| WizardMsg::Restart)}>
                        { "Start over" }
                    </button>
                    <button class="wizard-button" disabled={busy || blank} onclick={ctx.link().callback(|_| WizardMsg::Submit)}>
                        if busy {
                            <span class="loading-spinner"></span>
                        } else {
                            { "Next" }
                        }
                    </button>
                </div>
            </>
        }
    }
}
