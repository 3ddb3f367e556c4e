//! Parsers for the parameter part of information responses, e.g. `17,0` of
//! `+CSQ: 17,0`.

use heapless::String;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::u8 as dec_u8,
    combinator::{map, opt, value},
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};

use super::types::{RegistrationStatus, SignalQuality, SimStatus};
use crate::helpers::lines;
use crate::Error;

/// Run `parser` over `input`, discarding any trailing bytes.
pub(crate) fn parse<'a, O>(
    mut parser: impl FnMut(&'a [u8]) -> IResult<&'a [u8], O>,
    input: &'a [u8],
) -> Result<O, Error> {
    parser(input).map(|(_, o)| o).map_err(|_| Error::Parse)
}

pub(crate) fn to_string<const N: usize>(bytes: &[u8]) -> Result<String<N>, Error> {
    let s = core::str::from_utf8(bytes).map_err(|_| Error::Parse)?;
    String::try_from(s).map_err(|_| Error::Parse)
}

/// First line of a response that is neither the command echo nor the final
/// result code, e.g. the serial number returned by `AT+CGSN`.
pub(crate) fn information(response: &[u8]) -> Option<&[u8]> {
    lines(response).find(|line| {
        !(line.starts_with(b"AT") || line.starts_with(b"at") || *line == b"OK")
    })
}

/// `"<text>"`
pub(crate) fn quoted(i: &[u8]) -> IResult<&[u8], &[u8]> {
    delimited(tag("\""), take_until("\""), tag("\""))(i)
}

/// `<rssi>,<ber>`
pub(crate) fn signal_quality(i: &[u8]) -> IResult<&[u8], SignalQuality> {
    map(separated_pair(dec_u8, tag(","), dec_u8), |(rssi, ber)| {
        SignalQuality { rssi, ber }
    })(i)
}

/// `<n>,<stat>[,<lac>,<ci>]`
pub(crate) fn registration(i: &[u8]) -> IResult<&[u8], RegistrationStatus> {
    map(preceded(tuple((dec_u8, tag(","))), dec_u8), |stat| {
        RegistrationStatus::from_stat(stat)
    })(i)
}

/// `<code>` of `+CPIN`
pub(crate) fn sim_status(i: &[u8]) -> IResult<&[u8], SimStatus> {
    alt((
        value(SimStatus::Ready, tag("READY")),
        value(SimStatus::Pin2Required, tag("SIM PIN2")),
        value(SimStatus::Puk2Required, tag("SIM PUK2")),
        value(SimStatus::PinRequired, tag("SIM PIN")),
        value(SimStatus::PukRequired, tag("SIM PUK")),
        value(SimStatus::PhoneToSimPinRequired, tag("PH-SIM PIN")),
        value(SimStatus::NotInserted, tag("NOT INSERTED")),
    ))(i)
}

/// `<mode>[,<format>,"<oper>"]`, yielding the operator name if registered
pub(crate) fn operator(i: &[u8]) -> IResult<&[u8], Option<&[u8]>> {
    preceded(
        dec_u8,
        opt(preceded(tuple((tag(","), dec_u8, tag(","))), quoted)),
    )(i)
}

/// `"<stat>","<oa>"` leading the `+CMGR` header in text mode
pub(crate) fn sms_header(i: &[u8]) -> IResult<&[u8], (&[u8], &[u8])> {
    separated_pair(quoted, tag(","), quoted)(i)
}
