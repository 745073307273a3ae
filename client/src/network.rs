use crate::error::ClientError;
use crate::input::GuessReader;
use crate::transcript::{self, Outcome};
use log::{debug, info};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use wordle_shared::{Packet, PACKET_SIZE};

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Won,
    Lost,
    ServerClosed,
    InputExhausted,
}

pub struct Client<S> {
    stream: S,
}

impl Client<TcpStream> {
    pub async fn connect(host: &str, port: u16) -> Result<Self, ClientError> {
        let addr = format!("{}:{}", host, port);
        info!("Connecting to {}", addr);

        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| ClientError::Connect { addr, source })?;
        stream.set_nodelay(true)?;

        Ok(Self::new(stream))
    }
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Sends one guess per input line and prints each reply to `out`.
    ///
    /// Each guess goes out as a single write and is followed by a blocking
    /// read of exactly one 8-byte reply, which is what keeps the unframed
    /// protocol in step.
    pub async fn play<R, W>(&mut self, input: R, out: &mut W) -> Result<GameOutcome, ClientError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut guesses = GuessReader::new(input);

        loop {
            write!(out, "CLIENT: sending to server: ")?;
            out.flush()?;

            let Some(guess) = guesses.next_guess().await? else {
                writeln!(out)?;
                return Ok(GameOutcome::InputExhausted);
            };

            self.stream.write_all(guess.as_bytes()).await?;
            debug!("sent guess {:?}", guess);

            let mut buf = [0u8; PACKET_SIZE];
            match self.stream.read_exact(&mut buf).await {
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    writeln!(out, "CLIENT: server closed connection or error occurred.")?;
                    return Ok(GameOutcome::ServerClosed);
                }
                Err(e) => return Err(e.into()),
            }

            let packet = Packet::decode(&buf)?;
            writeln!(out, "{}", transcript::describe(&packet))?;

            let outcome = transcript::classify(&packet, &guess);
            if let Some(line) = transcript::announce(outcome, &packet) {
                writeln!(out, "{}", line)?;
            }

            match outcome {
                Outcome::Won => return Ok(GameOutcome::Won),
                Outcome::Lost => return Ok(GameOutcome::Lost),
                Outcome::Continue => {}
            }
        }
    }
}
