use leptos::*;
use showtools::review::MAX_RATING;
use showtools::{Browser, ReviewError, ReviewForm};

use crate::web::WebBrowser;

/// Star rating plus comment, sent as a pre-filled email draft.
#[component]
pub fn ReviewWidget(recipient: String) -> impl IntoView {
    let form = create_rw_signal(ReviewForm::new());
    let (error, set_error) = create_signal(None::<ReviewError>);

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        match form.try_update(|f| f.submit(&recipient)) {
            Some(Ok(uri)) => {
                set_error.set(None);
                if let Err(e) = WebBrowser.navigate(&uri) {
                    log::error!("Could not open mail client: {}", e);
                }
            }
            Some(Err(e)) => set_error.set(Some(e)),
            None => {}
        }
    };

    view! {
        <form class="review-form" on:submit=submit>
            <div class="star-rating" role="radiogroup" aria-label="Rating">
                {(1..=MAX_RATING)
                    .map(|n| {
                        view! {
                            <button
                                type="button"
                                class="star"
                                class:active=move || form.with(|f| f.rating() >= n)
                                aria-label=format!("{} star{}", n, if n == 1 { "" } else { "s" })
                                on:click=move |_| {
                                    form.update(|f| f.set_rating(n));
                                    set_error.set(None);
                                }
                            >
                                "★"
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <input
                type="text"
                id="reviewName"
                class="input"
                placeholder="Your name (optional)"
                prop:value=move || form.with(|f| f.name().to_string())
                on:input=move |ev| form.update(|f| f.set_name(event_target_value(&ev)))
            />
            <textarea
                id="reviewText"
                class="input"
                rows="4"
                placeholder="How are you using Show Tools?"
                prop:value=move || form.with(|f| f.text().to_string())
                on:input=move |ev| form.update(|f| f.set_text(event_target_value(&ev)))
            ></textarea>

            <Show when=move || error.get().is_some() fallback=|| ()>
                <p class="error-text">{move || error.get().map(|e| e.to_string()).unwrap_or_default()}</p>
            </Show>

            <button type="submit" class="btn btn-primary">"Send Review"</button>
        </form>
    }
}
