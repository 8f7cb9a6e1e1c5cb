//! Spoken text for every skill response. Plain text only.

use chrono::NaiveDate;

use crate::bottom_line::BottomLine;
use crate::forecast::{DangerTier, ForecastEntry, SummaryPlan};

pub const LAUNCH: &str = "Welcome to Avalanche Forecast! I can tell you the latest avalanche \
information in the United States. To learn what you can ask me, say \"help\".";

pub const LAUNCH_REPROMPT: &str =
    "Hi there! I can tell you the latest avalanche forecast. Ask away!";

pub const HELP: &str = "I can help you with three things. First, I can tell you the danger \
rating and travel advice for a region in the US. For example, you can just say \"What is the \
avalanche forecast in Stevens Pass?\" or \"Conditions in Mount Shasta\". Second, I can give you \
a summary of the avalanche forecast in your state while telling you where the lowest danger is. \
Just ask: \"Where can I go in Utah?\" or \"What is the latest forecast in Montana?\". Finally, \
you can ask me what the bottom line is for regions only in Washington state. Just say \"Bottom \
line for Snoqualmie Pass\".";

pub const GOODBYE: &str = "Thank you for using Avalanche Forecast. Goodbye!";

pub const UPSTREAM_UNAVAILABLE: &str =
    "I am having trouble getting the latest avalanche forecast. Please try again later.";

pub const BOTTOM_LINE_UNAVAILABLE: &str =
    "I can't get the latest bottom line right now. You can try again later.";

pub const BOTTOM_LINE_WASHINGTON_ONLY: &str =
    "I am sorry, but I can only provide bottom line information for regions in Washington state.";

#[must_use]
pub fn region_forecast(region_name: &str, forecast: &ForecastEntry) -> String {
    if forecast.is_rated() {
        format!(
            "The avalanche danger for {region_name} is {}. {}",
            forecast.danger, forecast.travel_advice
        )
    } else {
        format!(
            "There is currently no avalanche danger rating for {region_name}. General travel advice is to {}",
            forecast.travel_advice
        )
    }
}

#[must_use]
pub fn bottom_line(region_name: &str, forecast: &ForecastEntry, bottom_line: &BottomLine) -> String {
    let issued = spoken_date(bottom_line.issued);
    if forecast.is_rated() {
        format!(
            "The avalanche danger for {region_name} is {}, and the bottom line, issued on {issued}, is as follows: {}",
            forecast.danger, bottom_line.text
        )
    } else {
        format!(
            "There is currently no avalanche danger rating for {region_name}, but the bottom line, issued on {issued}, is as follows: {}",
            bottom_line.text
        )
    }
}

fn spoken_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Render a state summary; wording depends on the tier and how many regions share it.
#[must_use]
pub fn state_summary(state_name: &str, plan: &SummaryPlan) -> String {
    let advice = plan.sample_advice.as_deref().unwrap_or_default();

    if plan.all_no_rating {
        return format!(
            "There is currently no avalanche danger rating for the state of {state_name}. General travel advice is to {advice}"
        );
    }

    let regions = plan.region_list().unwrap_or_default();
    let count = plan.named_regions.len();

    match plan.tier {
        Some(DangerTier::Low) => match count {
            1 => format!(
                "The only region with low avalanche danger rating in the state of {state_name} is {regions}. {advice} Be careful if you are headed to the other regions."
            ),
            2 => format!(
                "Regions {regions} have low avalanche danger rating in the state of {state_name}. {advice} Be careful if you are headed to the other regions."
            ),
            _ => format!(
                "Several regions have low avalanche danger rating in {state_name}. These are: {regions}. {advice} Happy shredding!"
            ),
        },
        Some(DangerTier::Moderate) => match count {
            1 => format!(
                "Currently in {state_name}, there are no regions with low avalanche danger rating. However, {regions} has a rating of moderate. {advice}"
            ),
            2 => format!(
                "Currently in {state_name}, there are no regions with low avalanche danger rating, but regions {regions} have an avalanche danger rating of moderate. {advice}"
            ),
            _ => format!(
                "No regions with low avalanche danger rating in {state_name}. But several regions such as {regions} have a moderate avalanche danger rating. {advice}"
            ),
        },
        Some(DangerTier::Considerable) => match count {
            1 => format!(
                "Currently in {state_name}, there are no regions with low or moderate avalanche danger rating. However, {regions} has a rating of considerable. {advice} Be safe out there!"
            ),
            2 => format!(
                "Currently in {state_name}, there are no regions with low or moderate avalanche danger rating, but regions {regions} have an avalanche danger rating of considerable. {advice} Be safe out there!"
            ),
            _ => format!(
                "No regions with low avalanche danger rating in {state_name}. But several regions such as {regions} have a considerable avalanche danger rating. {advice} Stay safe!"
            ),
        },
        Some(DangerTier::High) => format!(
            "There are no regions with low, moderate or considerable avalanche danger rating in the state of {state_name}. {advice} But hey, you can probably ski inbounds!"
        ),
        Some(DangerTier::Extreme) | None => match plan.sample_advice.as_deref() {
            Some(advice) => format!(
                "The avalanche danger rating in regions of {state_name} is extreme. {advice} I'm staying cozy at home, you should too!"
            ),
            None => format!(
                "The avalanche danger rating in regions of {state_name} is extreme. I'm staying cozy at home, you should too!"
            ),
        },
    }
}
