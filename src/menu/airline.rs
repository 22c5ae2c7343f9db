//! Built-in HarshAir menus

use super::{Action, DigitCapture, DtmfSymbol, GraphError, MenuGraph, MenuNode, ROOT_NODE};

pub const MAIN_PROMPT: &str = "Welcome to HarshAir. For quick access press:\n\
1 Booking\n\
2 Flight Status\n\
3 Baggage Help\n\
4 Refunds & Cancellations\n\
5 Seat Selection\n\
6 Loyalty & Miles\n\
7 Travel Advisory\n\
8 Feedback\n\
9 Talk to Agent";

pub const FLIGHT_STATUS: &str = "flight_status";

fn key(d: u8) -> DtmfSymbol {
    DtmfSymbol::digit(d)
}

fn back(message: &str) -> Action {
    Action::navigate(ROOT_NODE, message)
}

/// The airline phone tree served when no menu file is configured
pub fn menu() -> Result<MenuGraph, GraphError> {
    let main = MenuNode::new(ROOT_NODE, MAIN_PROMPT)
        .with_option(
            key(1),
            Action::navigate("booking", "Booking selected. Redirecting to booking options."),
        )
        .with_option(
            key(2),
            Action::navigate(FLIGHT_STATUS, "Flight Status selected. We will ask for your PNR."),
        )
        .with_option(
            key(3),
            Action::navigate("baggage", "Baggage help. Few options coming up."),
        )
        .with_option(
            key(4),
            Action::navigate("refunds", "Refunds & cancellations. Please choose."),
        )
        .with_option(key(5), Action::navigate("seat", "Seat selection. Help coming."))
        .with_option(key(6), Action::navigate("loyalty", "Loyalty program options."))
        .with_option(
            key(7),
            Action::navigate("advisory", "Travel advisory and guidelines."),
        )
        .with_option(
            key(8),
            Action::navigate("feedback", "We appreciate feedback. Short survey."),
        )
        .with_option(key(9), Action::transfer("Connecting to an agent. Please hold."));

    let booking = MenuNode::new(
        "booking",
        "Booking. Press 1 New booking, 2 Modify booking, 3 Cancel booking, 0 Back to main.",
    )
    .with_option(
        key(1),
        Action::end_call("New booking selected. Our booking team will call you."),
    )
    .with_option(
        key(2),
        Action::end_call("Modify booking selected. We will email details."),
    )
    .with_option(
        key(3),
        Action::end_call("Cancel booking selected. Refund policy explained via email."),
    )
    .with_option(key(0), back("Returning to main menu."));

    let flight_status = MenuNode::new(
        FLIGHT_STATUS,
        "Please type your 6-digit PNR followed by the hash key.",
    )
    .with_capture(DigitCapture::default())
    .with_option(DtmfSymbol::HASH, Action::lookup("Checking PNR..."));

    let baggage = MenuNode::new(
        "baggage",
        "Baggage. Press 1 Lost item, 2 Excess baggage charges, 0 Back.",
    )
    .with_option(
        key(1),
        Action::end_call("Lost item reported. We'll initiate tracing."),
    )
    .with_option(
        key(2),
        Action::end_call("Excess baggage info: charges apply as per fare rules."),
    )
    .with_option(key(0), back("Back to main menu."));

    let refunds = MenuNode::new(
        "refunds",
        "Refunds. Press 1 Fare rules, 2 Request refund, 0 Back.",
    )
    .with_option(key(1), Action::end_call("Fare rules guided to your email."))
    .with_option(
        key(2),
        Action::end_call("Refund request received. We will process it."),
    )
    .with_option(key(0), back("Back to main."));

    let seat = MenuNode::new(
        "seat",
        "Seat Selection. Press 1 Aisle, 2 Window, 3 Extra legroom, 0 Back.",
    )
    .with_option(key(1), Action::end_call("Aisle preference noted."))
    .with_option(key(2), Action::end_call("Window preference noted."))
    .with_option(key(3), Action::end_call("Extra legroom request recorded."))
    .with_option(key(0), back("Back to main."));

    let loyalty = MenuNode::new(
        "loyalty",
        "Loyalty. Press 1 Check miles, 2 Redeem miles, 0 Back.",
    )
    .with_option(
        key(1),
        Action::end_call("Miles balance will be sent to your registered email."),
    )
    .with_option(
        key(2),
        Action::end_call("Redeem flow initiated. Agent will assist."),
    )
    .with_option(key(0), back("Back to main."));

    let advisory = MenuNode::new(
        "advisory",
        "Travel advisory. Press 1 Covid rules, 2 Visa & docs, 0 Back.",
    )
    .with_option(
        key(1),
        Action::end_call("Covid travel guidelines: check official site."),
    )
    .with_option(
        key(2),
        Action::end_call("Visa & docs details: refer to airline website."),
    )
    .with_option(key(0), back("Back to main."));

    let feedback = MenuNode::new(
        "feedback",
        "Feedback. Press 1 Rate 1-3, 2 Rate 4-5, 0 Back.",
    )
    .with_option(
        key(1),
        Action::end_call("Thanks for your feedback. We'll improve."),
    )
    .with_option(
        key(2),
        Action::end_call("Thanks! Glad you had a great experience."),
    )
    .with_option(key(0), back("Back to main."));

    MenuGraph::new(
        ROOT_NODE,
        [
            main,
            booking,
            flight_status,
            baggage,
            refunds,
            seat,
            loyalty,
            advisory,
            feedback,
        ],
    )
}
