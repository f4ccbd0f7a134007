//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Unit normal for a face shorthand like `+y` or `-x`
fn axis_normal(axis: &str, sign: f64) -> Option<Vec3> {
    match axis {
        "x" => Some([sign, 0.0, 0.0]),
        "y" => Some([0.0, sign, 0.0]),
        "z" => Some([0.0, 0.0, sign]),
        _ => None,
    }
}

/// Parse layout script source into an AST
pub fn parse(input: &str) -> Result<Script, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    script_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn script_parser<'a, I>() -> impl Parser<'a, I, Script, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // Basic token parsers
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    let string_literal = select! {
        Token::String(s) => s,
    }
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

    let number = select! {
        Token::Number(n) => n,
    };

    // Numbers with an optional leading minus
    let signed_number = just(Token::Minus)
        .or_not()
        .then(number)
        .map(|(neg, n)| if neg.is_some() { -n } else { n });

    // (x, y, z)
    let vec3 = signed_number
        .clone()
        .then_ignore(just(Token::Comma))
        .then(signed_number.clone())
        .then_ignore(just(Token::Comma))
        .then(signed_number.clone())
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
        .map_with(|((x, y), z), e| Spanned::new([x, y, z], span_range(&e.span())));

    // Modifier keys are identifiers, plus the `size` keyword (for text labels)
    let modifier_key = choice((
        just(Token::Size).map_with(|_, e| Spanned::new("size".to_string(), span_range(&e.span()))),
        identifier.clone().map(|id| Spanned::new(id.node.0, id.span)),
    ));

    let modifier_value = choice((
        select! { Token::HexColor(c) => ModifierValue::Color(c) },
        signed_number.clone().map(ModifierValue::Number),
        select! { Token::String(s) => ModifierValue::String(s) },
        select! { Token::Ident(s) => ModifierValue::Keyword(s) },
    ))
    .map_with(|v, e| Spanned::new(v, span_range(&e.span())));

    let modifier = modifier_key
        .then_ignore(just(Token::Colon))
        .then(modifier_value)
        .map_with(|(key, value), e| Spanned::new(Modifier { key, value }, span_range(&e.span())));

    let modifier_block = modifier
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    // block NAME at (x, y, z) [size (w, h, d)] [modifiers]
    let block_decl = just(Token::Block)
        .ignore_then(identifier.clone())
        .then_ignore(just(Token::At))
        .then(vec3.clone())
        .then(just(Token::Size).ignore_then(vec3.clone()).or_not())
        .then(modifier_block.clone().or_not())
        .map(|(((name, position), size), modifiers)| {
            Command::Block(BlockDecl {
                name,
                position,
                size,
                modifiers: modifiers.unwrap_or_default(),
            })
        });

    // Face normal: shorthand `+y` / `-x`, or an explicit vector
    let face_shorthand = choice((just(Token::Plus).to(1.0), just(Token::Minus).to(-1.0)))
        .then(identifier.clone())
        .try_map(|(sign, axis), span: SimpleSpan| {
            axis_normal(axis.node.as_str(), sign)
                .map(|normal| Spanned::new(normal, span_range(&span)))
                .ok_or_else(|| {
                    Rich::custom(
                        span,
                        format!("'{}' is not an axis. Expected one of: x, y, z", axis.node),
                    )
                })
        });
    let face_normal = choice((face_shorthand, vec3.clone()));

    // add at (x, y, z) | add next_to NAME face NORMAL
    let add_command = just(Token::Add).ignore_then(choice((
        just(Token::At)
            .ignore_then(vec3.clone())
            .map(AddCommand::At),
        just(Token::NextTo)
            .ignore_then(identifier.clone())
            .then_ignore(just(Token::Face))
            .then(face_normal)
            .map(|(source, normal)| AddCommand::NextTo { source, normal }),
    )))
    .map(Command::Add);

    // resize NAME to (w, h, d) | resize NAME width|height|depth VALUE
    let extent_change = identifier
        .clone()
        .then(signed_number.clone())
        .try_map(|(name, value), span: SimpleSpan| match Extent::from_name(name.node.as_str()) {
            Some(extent) => Ok(ResizeSpec::Extent { extent, value }),
            None => Err(Rich::custom(
                span,
                format!(
                    "'{}' is not a block extent. Expected one of: width, height, depth",
                    name.node
                ),
            )),
        });
    let resize_spec = choice((
        just(Token::To)
            .ignore_then(vec3.clone())
            .map(|v| ResizeSpec::To(v.node)),
        extent_change,
    ))
    .map_with(|spec, e| Spanned::new(spec, span_range(&e.span())));

    let resize_command = just(Token::Resize)
        .ignore_then(identifier.clone())
        .then(resize_spec)
        .map(|(target, spec)| Command::Resize(ResizeCommand { target, spec }));

    // move NAME to (x, y, z)
    let move_command = just(Token::Move)
        .ignore_then(identifier.clone())
        .then_ignore(just(Token::To))
        .then(vec3.clone())
        .map(|(target, position)| Command::Move(MoveCommand { target, position }));

    // remove NAME
    let remove_command = just(Token::Remove)
        .ignore_then(identifier.clone())
        .map(Command::Remove);

    // text NAME "content" at (x, y, z) [modifiers]
    let text_decl = just(Token::Text)
        .ignore_then(identifier.clone())
        .then(string_literal)
        .then_ignore(just(Token::At))
        .then(vec3.clone())
        .then(modifier_block.or_not())
        .map(|(((name, content), position), modifiers)| {
            Command::Text(TextDecl {
                name,
                content,
                position,
                modifiers: modifiers.unwrap_or_default(),
            })
        });

    let command = choice((
        block_decl,
        add_command,
        resize_command,
        move_command,
        remove_command,
        text_decl,
    ))
    .map_with(|c, e| Spanned::new(c, span_range(&e.span())));

    // A script is a list of commands
    command
        .repeated()
        .collect()
        .then_ignore(end())
        .map(|commands| Script { commands })
}
